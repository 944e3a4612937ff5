use api_types::{
    ErrorBody,
    account::{AccountUpsert, AccountView, TransferNew},
    auth::{
        ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
        RegisterRequest, RegisterResponse, ResetPasswordRequest, VerifySecurityRequest,
    },
    notification::NotificationsResponse,
    reminder::{BillCreated, BillNew, RemindersResponse},
    report::ReportRequest,
    session::SessionsResponse,
    transaction::{TransactionCreated, TransactionQuery, TransactionUpdate, TransactionView},
};
use chrono::{DateTime, NaiveDate, Utc};
use engine::{
    Account, AccountDraft, Alert, Bill, Money, Transaction, TransactionDraft, TransactionEdit,
    TransactionId, TransferRequest,
};
use reqwest::{RequestBuilder, Response, Url, header::CONTENT_DISPOSITION};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::Result;

mod convert;

pub use convert::wire_division;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("session expired, please log in again")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Server(String),
    #[error("network error: {0}")]
    Transport(reqwest::Error),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportKind {
    Monthly,
    DateRange,
    Budget,
    FullAccount,
}

impl ReportKind {
    fn path(self) -> &'static str {
        match self {
            Self::Monthly => "reports/monthly",
            Self::DateRange => "reports/daterange",
            Self::Budget => "reports/budget",
            Self::FullAccount => "reports/fullaccount",
        }
    }
}

/// A downloaded report.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A device signed in to the account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSession {
    pub id: String,
    pub device: String,
    pub last_active: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)?;
        Ok(Self {
            base_url,
            http: reqwest::Client::builder().build()?,
            token: None,
        })
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub async fn login(&self, username: &str, password: &str) -> ClientResult<LoginResponse> {
        let payload = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let res = self
            .send(self.http.post(self.endpoint("auth/login")?).json(&payload))
            .await?;
        let login: LoginResponse = decode(res).await?;
        if login.token.is_empty() {
            return Err(ClientError::Validation("Login failed".to_string()));
        }
        Ok(login)
    }

    /// Returns the backend's confirmation message.
    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<String> {
        let res = self
            .send(self.http.post(self.endpoint("auth/register")?).json(payload))
            .await?;
        let body: RegisterResponse = decode(res).await?;
        if !body.success {
            return Err(ClientError::Validation(
                body.message.unwrap_or_else(|| "Registration failed".to_string()),
            ));
        }
        Ok(body
            .message
            .unwrap_or_else(|| "Registration successful".to_string()))
    }

    /// Returns the security question registered for `username`.
    pub async fn forgot_password(&self, username: &str) -> ClientResult<String> {
        let payload = ForgotPasswordRequest {
            username: username.to_string(),
        };
        let res = self
            .send(
                self.http
                    .post(self.endpoint("auth/forgot-password")?)
                    .json(&payload),
            )
            .await?;
        let body: ForgotPasswordResponse = decode(res).await?;
        Ok(body.security_question)
    }

    pub async fn verify_security(&self, username: &str, answer: &str) -> ClientResult<()> {
        let payload = VerifySecurityRequest {
            username: username.to_string(),
            security_answer: answer.to_string(),
        };
        self.send(
            self.http
                .post(self.endpoint("auth/verify-security")?)
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    pub async fn reset_password(&self, request: &ResetPasswordRequest) -> ClientResult<()> {
        self.send(
            self.http
                .post(self.endpoint("auth/reset-password")?)
                .json(request),
        )
        .await?;
        Ok(())
    }

    pub async fn sessions(&self) -> ClientResult<Vec<DeviceSession>> {
        let res = self.send(self.http.get(self.endpoint("sessions")?)).await?;
        let body: SessionsResponse = decode(res).await?;
        Ok(body
            .sessions
            .into_iter()
            .map(convert::device_session)
            .collect())
    }

    pub async fn revoke_session(&self, id: &str) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint(&format!("sessions/{id}"))?))
            .await?;
        Ok(())
    }

    /// Signs every device out, this one included.
    pub async fn revoke_all_sessions(&self) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint("sessions")?))
            .await?;
        Ok(())
    }

    pub async fn logout(&self) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint("sessions/me")?))
            .await?;
        Ok(())
    }

    pub async fn check_due_reminders(&self) -> ClientResult<()> {
        self.send(self.http.post(self.endpoint("reminders/check-due")?))
            .await?;
        Ok(())
    }

    pub async fn transactions(&self, query: &TransactionQuery) -> ClientResult<Vec<Transaction>> {
        let res = self
            .send(self.http.get(self.endpoint("transactions")?).query(query))
            .await?;
        let views: Vec<TransactionView> = decode(res).await?;
        Ok(views.into_iter().map(convert::transaction).collect())
    }

    /// Expense/income of `[start, end]`, both inclusive.
    pub async fn transactions_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ClientResult<Vec<Transaction>> {
        let query = TransactionQuery {
            start: Some(start.format("%Y-%m-%d").to_string()),
            end: Some(end.format("%Y-%m-%d").to_string()),
            ..TransactionQuery::default()
        };
        self.transactions(&query).await
    }

    /// Returns the confirmed record, `None` when the backend did not echo it.
    pub async fn add_transaction(
        &self,
        draft: &TransactionDraft,
    ) -> ClientResult<Option<Transaction>> {
        let res = self
            .send(
                self.http
                    .post(self.endpoint("transactions/add")?)
                    .json(&convert::transaction_new(draft)),
            )
            .await?;
        let created: TransactionCreated = decode(res).await?;
        Ok(created.transaction.map(convert::transaction))
    }

    pub async fn update_transaction(
        &self,
        id: &TransactionId,
        edit: &TransactionEdit,
    ) -> ClientResult<Transaction> {
        let payload = TransactionUpdate {
            category: edit.category.clone(),
            amount: edit.amount.to_f64(),
        };
        let res = self
            .send(
                self.http
                    .put(self.endpoint(&format!("transactions/{id}"))?)
                    .json(&payload),
            )
            .await?;
        let view: TransactionView = decode(res).await?;
        Ok(convert::transaction(view))
    }

    pub async fn delete_transaction(&self, id: &TransactionId) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint(&format!("transactions/{id}"))?))
            .await?;
        Ok(())
    }

    pub async fn bills(&self) -> ClientResult<Vec<Bill>> {
        let res = self.send(self.http.get(self.endpoint("reminders")?)).await?;
        let body: RemindersResponse = decode(res).await?;
        Ok(body.reminders.into_iter().filter_map(convert::bill).collect())
    }

    pub async fn add_bill(
        &self,
        name: &str,
        amount: Money,
        due_date: NaiveDate,
    ) -> ClientResult<Option<Bill>> {
        let payload = BillNew {
            name: name.to_string(),
            amount: amount.to_f64(),
            due_date: due_date.format("%Y-%m-%d").to_string(),
        };
        let res = self
            .send(self.http.post(self.endpoint("reminders")?).json(&payload))
            .await?;
        let body: BillCreated = decode(res).await?;
        if !body.success {
            return Err(ClientError::Validation("Failed to add reminder".to_string()));
        }
        Ok(body.reminder.and_then(convert::bill))
    }

    pub async fn delete_bill(&self, id: &str) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint(&format!("reminders/{id}"))?))
            .await?;
        Ok(())
    }

    pub async fn notifications(&self) -> ClientResult<Vec<Alert>> {
        let res = self
            .send(self.http.get(self.endpoint("notifications")?))
            .await?;
        let body: NotificationsResponse = decode(res).await?;
        Ok(body
            .notifications
            .into_iter()
            .map(convert::notification)
            .collect())
    }

    pub async fn mark_notification_read(&self, id: &str) -> ClientResult<()> {
        self.send(
            self.http
                .post(self.endpoint(&format!("notifications/read/{id}"))?),
        )
        .await?;
        Ok(())
    }

    pub async fn accounts(&self) -> ClientResult<Vec<Account>> {
        let res = self.send(self.http.get(self.endpoint("accounts")?)).await?;
        let views: Vec<AccountView> = decode(res).await?;
        Ok(views.into_iter().map(convert::account).collect())
    }

    pub async fn add_account(&self, draft: &AccountDraft) -> ClientResult<()> {
        self.send(
            self.http
                .post(self.endpoint("accounts/add")?)
                .json(&account_upsert(draft)),
        )
        .await?;
        Ok(())
    }

    pub async fn update_account(&self, id: &str, draft: &AccountDraft) -> ClientResult<()> {
        self.send(
            self.http
                .put(self.endpoint(&format!("accounts/{id}"))?)
                .json(&account_upsert(draft)),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_account(&self, id: &str) -> ClientResult<()> {
        self.send(self.http.delete(self.endpoint(&format!("accounts/{id}"))?))
            .await?;
        Ok(())
    }

    pub async fn transfer(&self, request: &TransferRequest) -> ClientResult<()> {
        let payload = TransferNew {
            from: request.from.clone(),
            to: request.to.clone(),
            amount: request.amount.to_f64(),
        };
        self.send(
            self.http
                .post(self.endpoint("accounts/transfer")?)
                .json(&payload),
        )
        .await?;
        Ok(())
    }

    pub async fn report(&self, kind: ReportKind, request: &ReportRequest) -> ClientResult<ReportFile> {
        let res = self
            .send(self.http.post(self.endpoint(kind.path())?).json(request))
            .await?;
        let filename = res
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| "report".to_string());
        let bytes = res.bytes().await.map_err(ClientError::Transport)?;
        debug!(%filename, size = bytes.len(), "report downloaded");
        Ok(ReportFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let res = request.send().await.map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(res);
        }

        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });
        warn!(status = status.as_u16(), %body, "request failed");

        let err = match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            400 | 422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        };
        Err(err)
    }
}

async fn decode<T: DeserializeOwned>(res: Response) -> ClientResult<T> {
    res.json::<T>()
        .await
        .map_err(|err| ClientError::Decode(err.to_string()))
}

fn account_upsert(draft: &AccountDraft) -> AccountUpsert {
    AccountUpsert {
        name: draft.name.clone(),
        account_number: draft.account_number.clone(),
        balance: draft.balance.to_f64(),
    }
}

/// Extracts `name` from `attachment; filename="name"`.
fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests;
