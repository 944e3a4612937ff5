use chrono::{DateTime, Local};
use chrono_tz::Tz;
use engine::{Account, Bill, TransactionId, TransactionStore};
use api_types::transaction::TransactionQuery;

use crate::{
    client::DeviceSession,
    local_state::LocalState,
    notifications::Aggregator,
    ui::{Theme, components::toast::ToastStack},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Register,
    ForgotPassword,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Transactions,
    Bills,
    Accounts,
    Notifications,
    Reports,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Self::Home,
        Self::Transactions,
        Self::Bills,
        Self::Accounts,
        Self::Notifications,
        Self::Reports,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Transactions => "Transactions",
            Self::Bills => "Bills",
            Self::Accounts => "Accounts",
            Self::Notifications => "Alerts",
            Self::Reports => "Reports",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Home => 'h',
            Self::Transactions => 't',
            Self::Bills => 'b',
            Self::Accounts => 'a',
            Self::Notifications => 'n',
            Self::Reports => 'r',
        }
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.shortcut() == ch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub message: Option<String>,
    pub pending: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterField {
    Username,
    Password,
    Confirm,
    Question,
    Answer,
}

impl RegisterField {
    pub const ALL: [RegisterField; 5] = [
        Self::Username,
        Self::Password,
        Self::Confirm,
        Self::Question,
        Self::Answer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Confirm => "Confirm password",
            Self::Question => "Security question",
            Self::Answer => "Security answer",
        }
    }

    pub fn is_secret(self) -> bool {
        matches!(self, Self::Password | Self::Confirm | Self::Answer)
    }

    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct RegisterState {
    pub username: String,
    pub password: String,
    pub confirm: String,
    pub question: String,
    pub answer: String,
    pub focus: RegisterField,
    pub message: Option<String>,
}

impl Default for RegisterState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            confirm: String::new(),
            question: String::new(),
            answer: String::new(),
            focus: RegisterField::Username,
            message: None,
        }
    }
}

impl RegisterState {
    pub fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::Username => &self.username,
            RegisterField::Password => &self.password,
            RegisterField::Confirm => &self.confirm,
            RegisterField::Question => &self.question,
            RegisterField::Answer => &self.answer,
        }
    }

    pub fn field_mut(&mut self) -> &mut String {
        match self.focus {
            RegisterField::Username => &mut self.username,
            RegisterField::Password => &mut self.password,
            RegisterField::Confirm => &mut self.confirm,
            RegisterField::Question => &mut self.question,
            RegisterField::Answer => &mut self.answer,
        }
    }
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// The three steps of a password reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecoveryStep {
    #[default]
    Username,
    Answer,
    NewPassword,
}

impl RecoveryStep {
    pub fn number(self) -> usize {
        match self {
            Self::Username => 1,
            Self::Answer => 2,
            Self::NewPassword => 3,
        }
    }
}

#[derive(Debug, Default)]
pub struct RecoveryState {
    pub step: RecoveryStep,
    pub username: String,
    pub question: String,
    pub answer: String,
    pub new_password: String,
    pub confirm: String,
    /// On the last step, whether the confirmation field has the cursor.
    pub confirm_focused: bool,
    pub message: Option<String>,
    pub pending: bool,
}

impl RecoveryState {
    pub fn field_mut(&mut self) -> &mut String {
        match self.step {
            RecoveryStep::Username => &mut self.username,
            RecoveryStep::Answer => &mut self.answer,
            RecoveryStep::NewPassword if self.confirm_focused => &mut self.confirm,
            RecoveryStep::NewPassword => &mut self.new_password,
        }
    }
}

/// Checks a new password before it is sent.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<(), String> {
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        ));
    }
    Ok(())
}

/// Which list of the Accounts section has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccountsPane {
    #[default]
    Accounts,
    Sessions,
}

impl AccountsPane {
    pub fn toggled(self) -> Self {
        match self {
            Self::Accounts => Self::Sessions,
            Self::Sessions => Self::Accounts,
        }
    }
}

/// What the single-line prompt is collecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    AddTransaction,
    EditTransaction(TransactionId),
    Filter,
    AddBill,
    EditBill(String),
    AddAccount,
    EditAccount(String),
    Transfer,
    Budget,
    Income,
    Report,
}

impl PromptKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::AddTransaction => "Add transaction",
            Self::EditTransaction(_) => "Edit transaction",
            Self::Filter => "Filter transactions",
            Self::AddBill => "Add bill",
            Self::EditBill(_) => "Edit bill",
            Self::AddAccount => "Add account",
            Self::EditAccount(_) => "Edit account",
            Self::Transfer => "Transfer funds",
            Self::Budget => "Monthly budget",
            Self::Income => "Monthly income",
            Self::Report => "Download report",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::AddTransaction => "+1200 #salary note @Account !office   or   45 #food lunch",
            Self::EditTransaction(_) => "amount [#category]",
            Self::Filter => "from=YYYY-MM-DD to=YYYY-MM-DD #category !office @Account",
            Self::AddBill | Self::EditBill(_) => "name amount YYYY-MM-DD",
            Self::AddAccount | Self::EditAccount(_) => "name number balance",
            Self::Transfer => "from to amount",
            Self::Budget | Self::Income => "amount (empty clears)",
            Self::Report => "monthly M Y | range FROM TO | budget M Y | full [FROM TO]  [pdf|excel]",
        }
    }
}

#[derive(Debug)]
pub struct PromptState {
    pub kind: PromptKind,
    pub input: String,
    pub error: Option<String>,
}

impl PromptState {
    pub fn new(kind: PromptKind) -> Self {
        Self::with_input(kind, String::new())
    }

    pub fn with_input(kind: PromptKind, input: String) -> Self {
        Self {
            kind,
            input,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteCommand {
    AddTransaction,
    FilterTransactions,
    ClearFilter,
    AddBill,
    AddAccount,
    Transfer,
    SetBudget,
    SetIncome,
    DownloadReport,
    Refresh,
    ToggleTheme,
    Logout,
    LogoutAllDevices,
}

impl PaletteCommand {
    pub fn all() -> Vec<Self> {
        vec![
            Self::AddTransaction,
            Self::FilterTransactions,
            Self::ClearFilter,
            Self::AddBill,
            Self::AddAccount,
            Self::Transfer,
            Self::SetBudget,
            Self::SetIncome,
            Self::DownloadReport,
            Self::Refresh,
            Self::ToggleTheme,
            Self::Logout,
            Self::LogoutAllDevices,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AddTransaction => "Add transaction",
            Self::FilterTransactions => "Filter transactions",
            Self::ClearFilter => "Clear filters",
            Self::AddBill => "Add bill reminder",
            Self::AddAccount => "Add account",
            Self::Transfer => "Transfer between accounts",
            Self::SetBudget => "Set monthly budget",
            Self::SetIncome => "Set monthly income",
            Self::DownloadReport => "Download report",
            Self::Refresh => "Refresh everything",
            Self::ToggleTheme => "Toggle light/dark theme",
            Self::Logout => "Logout",
            Self::LogoutAllDevices => "Logout all devices",
        }
    }

    pub fn filtered(query: &str) -> Vec<Self> {
        let query = query.trim().to_lowercase();
        let all = Self::all();
        if query.is_empty() {
            return all;
        }
        all.into_iter()
            .filter(|cmd| cmd.label().to_lowercase().contains(&query))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct PaletteState {
    pub active: bool,
    pub query: String,
    pub selected: usize,
}

/// Transaction list plus the request bookkeeping around it.
#[derive(Debug, Default)]
pub struct TransactionsState {
    pub store: TransactionStore,
    pub selected: usize,
    pub filter: TransactionQuery,
    pub loading: bool,
    /// Sequence of the latest list request; older responses are dropped.
    pub load_seq: u64,
}

impl TransactionsState {
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.store.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
    }

    pub fn is_filtered(&self) -> bool {
        self.filter != TransactionQuery::default()
    }
}

/// Cursor over a plain list.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cursor {
    pub selected: usize,
}

impl Cursor {
    pub fn next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub register: RegisterState,
    pub recovery: RecoveryState,
    pub local: LocalState,
    pub transactions: TransactionsState,
    pub bills: Vec<Bill>,
    pub bills_cursor: Cursor,
    pub accounts: Vec<Account>,
    pub accounts_cursor: Cursor,
    pub accounts_pane: AccountsPane,
    pub sessions: Vec<DeviceSession>,
    pub sessions_cursor: Cursor,
    pub alerts: Aggregator,
    pub alerts_cursor: Cursor,
    pub prompt: Option<PromptState>,
    pub palette: PaletteState,
    pub toasts: ToastStack,
    pub last_report: Option<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub connected: bool,
    pub tz: Tz,
    pub currency_symbol: String,
    pub base_url: String,
}

impl AppState {
    pub fn theme(&self) -> Theme {
        Theme::for_preference(self.local.theme)
    }

    pub fn username(&self) -> &str {
        self.local
            .session
            .as_ref()
            .map(|s| s.username.as_str())
            .unwrap_or_default()
    }

    pub fn is_signed_in(&self) -> bool {
        self.local.session.is_some()
    }

    /// Whether `session` is the one this client is signed in with.
    pub fn is_this_device(&self, session: &DeviceSession) -> bool {
        self.local
            .session
            .as_ref()
            .and_then(|s| s.session_id.as_deref())
            .is_some_and(|id| id == session.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_shortcuts_round_trip() {
        for section in Section::ALL {
            assert_eq!(Section::from_shortcut(section.shortcut()), Some(section));
        }
        assert_eq!(Section::from_shortcut('z'), None);
    }

    #[test]
    fn palette_filter_is_case_insensitive() {
        let found = PaletteCommand::filtered("BUDGET");
        assert_eq!(found, vec![PaletteCommand::SetBudget]);
        assert_eq!(PaletteCommand::filtered("").len(), PaletteCommand::all().len());
    }

    #[test]
    fn new_password_rules() {
        assert_eq!(
            validate_new_password("abcdef", "abcdeg"),
            Err("Passwords do not match".to_string())
        );
        assert_eq!(
            validate_new_password("abc", "abc"),
            Err("Password must be at least 6 characters".to_string())
        );
        assert!(validate_new_password("äbcdéf", "äbcdéf").is_ok());
    }

    #[test]
    fn recovery_input_follows_step() {
        let mut recovery = RecoveryState::default();
        recovery.field_mut().push_str("asha");
        recovery.step = RecoveryStep::NewPassword;
        recovery.field_mut().push_str("secret");
        recovery.confirm_focused = true;
        recovery.field_mut().push_str("secret");
        assert_eq!(recovery.username, "asha");
        assert_eq!(recovery.new_password, "secret");
        assert_eq!(recovery.confirm, "secret");
    }

    #[test]
    fn register_focus_cycles() {
        let mut field = RegisterField::Username;
        for _ in 0..RegisterField::ALL.len() {
            field = field.next();
        }
        assert_eq!(field, RegisterField::Username);
    }
}
