//! JSON wire types spoken by the finance backend.
//!
//! Field names follow the backend (`_id`, camelCase). Amounts travel as plain
//! JSON numbers in major units; conversion to integer cents happens on the
//! client side.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LoginResponse {
        #[serde(default)]
        pub success: bool,
        pub token: String,
        #[serde(default)]
        pub user_id: Option<String>,
        pub username: String,
        #[serde(default)]
        pub session_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterRequest {
        pub username: String,
        pub password: String,
        pub confirm_password: String,
        pub security_question: String,
        pub security_answer: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterResponse {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub message: Option<String>,
    }

    /// First step of a password reset.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ForgotPasswordRequest {
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ForgotPasswordResponse {
        pub security_question: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VerifySecurityRequest {
        pub username: String,
        pub security_answer: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResetPasswordRequest {
        pub username: String,
        pub new_password: String,
        pub confirm_password: String,
    }
}

pub mod session {
    use super::*;

    /// A device signed in to the account.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SessionView {
        pub session_id: String,
        #[serde(default)]
        pub device: String,
        #[serde(default)]
        pub last_active_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SessionsResponse {
        #[serde(default)]
        pub sessions: Vec<SessionView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionType {
        Income,
        Expense,
        Transfer,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub enum Division {
        #[default]
        Personal,
        Office,
    }

    /// Account state captured by the backend when a transfer is booked.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransferLegView {
        pub account_name: String,
        #[serde(default)]
        pub account_number: String,
        #[serde(default)]
        pub balance_before: f64,
        #[serde(default)]
        pub balance_after: f64,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        #[serde(rename = "type")]
        pub kind: TransactionType,
        #[serde(default)]
        pub category: String,
        #[serde(default)]
        pub division: Division,
        pub amount: f64,
        pub date: DateTime<Utc>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub account: Option<String>,
        #[serde(default)]
        pub from: Option<TransferLegView>,
        #[serde(default)]
        pub to: Option<TransferLegView>,
    }

    /// Query string of `GET /transactions`. Empty fields are omitted.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TransactionQuery {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub division: Option<Division>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub account: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        #[serde(rename = "type")]
        pub kind: TransactionType,
        pub category: String,
        pub division: Division,
        pub amount: f64,
        pub date: DateTime<Utc>,
        pub description: String,
        pub account: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        #[serde(default)]
        pub transaction: Option<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub category: String,
        pub amount: f64,
    }
}

pub mod reminder {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub name: String,
        pub amount: f64,
        /// ISO date or datetime; only the calendar date is meaningful.
        pub due_date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RemindersResponse {
        #[serde(default)]
        pub reminders: Vec<BillView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BillNew {
        pub name: String,
        pub amount: f64,
        pub due_date: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillCreated {
        #[serde(default)]
        pub success: bool,
        #[serde(default)]
        pub reminder: Option<BillView>,
    }
}

pub mod notification {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        #[serde(default)]
        pub title: String,
        #[serde(default)]
        pub body: String,
        #[serde(default)]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default)]
        pub read: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationsResponse {
        #[serde(default)]
        pub notifications: Vec<NotificationView>,
        #[serde(default)]
        pub unread_count: Option<u64>,
    }
}

pub mod account {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountView {
        #[serde(rename = "_id", alias = "id")]
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub account_number: String,
        #[serde(default)]
        pub balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AccountUpsert {
        pub name: String,
        pub account_number: String,
        pub balance: f64,
    }

    /// `from`/`to` are account names, as the backend resolves them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from: String,
        pub to: String,
        pub amount: f64,
    }
}

pub mod report {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ReportFormat {
        #[default]
        Pdf,
        Excel,
    }

    /// Request body of the `/reports/*` endpoints.
    ///
    /// Each report kind reads only the fields it needs; the rest are omitted.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ReportRequest {
        pub format: ReportFormat,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub month: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub year: Option<i32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub from_date: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub to_date: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_view_accepts_backend_shape() {
        let raw = r#"{
            "_id": "65f0",
            "type": "expense",
            "category": "Food",
            "division": "Office",
            "amount": 12.5,
            "date": "2026-02-05T10:30:00.000Z",
            "description": "lunch",
            "account": "Cash"
        }"#;
        let tx: transaction::TransactionView = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.id, "65f0");
        assert_eq!(tx.kind, transaction::TransactionType::Expense);
        assert_eq!(tx.division, transaction::Division::Office);
        assert!(tx.from.is_none());
    }

    #[test]
    fn transfer_omits_category() {
        let raw = r#"{
            "id": "t1",
            "type": "transfer",
            "amount": 100,
            "date": "2026-02-05T10:30:00Z",
            "from": {"accountName": "HDFC", "accountNumber": "1", "balanceBefore": 500, "balanceAfter": 400},
            "to": {"accountName": "SBI", "accountNumber": "2", "balanceBefore": 0, "balanceAfter": 100}
        }"#;
        let tx: transaction::TransactionView = serde_json::from_str(raw).unwrap();
        assert_eq!(tx.category, "");
        assert_eq!(tx.division, transaction::Division::Personal);
        assert_eq!(tx.from.unwrap().account_name, "HDFC");
    }

    #[test]
    fn query_skips_empty_fields() {
        let query = transaction::TransactionQuery {
            start: Some("2026-02-01".to_string()),
            end: Some("2026-02-28".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"start": "2026-02-01", "end": "2026-02-28"}));
    }

    #[test]
    fn reset_request_uses_camel_case() {
        let request = auth::ResetPasswordRequest {
            username: "asha".to_string(),
            new_password: "s3cret!".to_string(),
            confirm_password: "s3cret!".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["newPassword"], "s3cret!");
        assert_eq!(json["confirmPassword"], "s3cret!");
    }

    #[test]
    fn sessions_tolerate_missing_fields() {
        let raw = r#"{"sessions": [
            {"sessionId": "s1", "device": "Firefox on Linux", "lastActiveAt": "2026-02-05T10:30:00.000Z"},
            {"sessionId": "s2"}
        ]}"#;
        let res: session::SessionsResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(res.sessions.len(), 2);
        assert_eq!(res.sessions[0].device, "Firefox on Linux");
        assert!(res.sessions[1].last_active_at.is_none());
    }

    #[test]
    fn notifications_default_to_empty() {
        let res: notification::NotificationsResponse = serde_json::from_str("{}").unwrap();
        assert!(res.notifications.is_empty());
        assert_eq!(res.unread_count, None);
    }
}
