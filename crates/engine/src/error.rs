//! The module contains the errors the engine can return.
//!
//! All of them are raised locally, before any request reaches the backend:
//!
//! - [`InvalidAmount`] when an amount cannot be parsed or is not positive.
//! - [`MissingField`] when a required form field is empty.
//! - [`EditWindowExpired`] when a [`Transaction`] is too old to be edited.
//! - [`SameAccount`] when a transfer names the same account twice.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`MissingField`]: EngineError::MissingField
//!  [`EditWindowExpired`]: EngineError::EditWindowExpired
//!  [`SameAccount`]: EngineError::SameAccount
//!  [`Transaction`]: super::transactions::Transaction
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Editing is allowed only within 12 hours of creation.")]
    EditWindowExpired,
    #[error("Choose different accounts")]
    SameAccount,
}
