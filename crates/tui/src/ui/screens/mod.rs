pub mod accounts;
pub mod alerts;
pub mod bills;
pub mod home;
pub mod login;
pub mod reports;
pub mod transactions;
