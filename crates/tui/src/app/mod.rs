use std::{
    future::Future,
    path::PathBuf,
    time::{Duration, Instant},
};

use api_types::auth::LoginResponse;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{Account, Bill, Trigger, Transaction, TransactionId, TransactionStore};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::info;

use crate::{
    bus::{AppEvent, EventBus, Subscription},
    client::{Client, ClientResult, DeviceSession},
    config::AppConfig,
    error::{AppError, Result},
    local_state::LocalState,
    notifications::{Aggregator, Fetched},
    ui::{
        self,
        components::toast::{Toast, ToastStack},
        keymap::{self, AppAction},
    },
};

mod flows;
mod state;

pub use state::{
    AccountsPane, AppState, Cursor, LoginField, LoginState, PaletteCommand, PaletteState,
    PromptKind, PromptState, RecoveryState, RecoveryStep, RegisterField, RegisterState, Screen,
    Section, TransactionsState,
};

/// Completion of a spawned request, applied by the UI loop in arrival order.
#[derive(Debug)]
pub enum Msg {
    LoggedIn(ClientResult<LoginResponse>),
    Registered(ClientResult<String>),
    SecurityQuestion(ClientResult<String>),
    SecurityVerified(ClientResult<()>),
    PasswordReset(ClientResult<()>),
    SessionsLoaded(ClientResult<Vec<DeviceSession>>),
    SessionRevoked {
        id: String,
        this_device: bool,
        result: ClientResult<()>,
    },
    AllSessionsRevoked(ClientResult<()>),
    TransactionsLoaded {
        seq: u64,
        result: ClientResult<Vec<Transaction>>,
    },
    TransactionAdded {
        temp_id: TransactionId,
        result: ClientResult<Option<Transaction>>,
    },
    TransactionUpdated {
        previous: Transaction,
        result: ClientResult<Transaction>,
    },
    TransactionDeleted {
        index: usize,
        previous: Transaction,
        result: ClientResult<()>,
    },
    BillsLoaded(ClientResult<Vec<Bill>>),
    BillChanged {
        success: &'static str,
        result: ClientResult<()>,
    },
    AccountsLoaded(ClientResult<Vec<Account>>),
    AccountChanged {
        success: &'static str,
        result: ClientResult<()>,
    },
    Transferred(ClientResult<()>),
    AlertsFetched(Fetched),
    AlertMarked(ClientResult<()>),
    ReportSaved(ClientResult<std::io::Result<PathBuf>>),
    Done,
}

pub struct App {
    config: AppConfig,
    client: Client,
    pub state: AppState,
    bus: EventBus,
    events: Subscription,
    tx: UnboundedSender<Msg>,
    rx: UnboundedReceiver<Msg>,
    last_input: Instant,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let tz = config.tz()?;
        let local = LocalState::load(&config.state_path)?;
        let mut client = Client::new(&config.base_url)?;
        client.set_token(local.session.as_ref().map(|s| s.token.clone()));
        let (tx, rx) = mpsc::unbounded_channel();
        let bus = EventBus::new();
        let events = bus.subscribe();

        let screen = if local.session.is_some() {
            Screen::Home
        } else {
            Screen::Login
        };
        let state = AppState {
            screen,
            section: Section::Home,
            login: LoginState {
                username: config.username.clone(),
                password: String::new(),
                focus: if config.username.is_empty() {
                    LoginField::Username
                } else {
                    LoginField::Password
                },
                message: None,
                pending: false,
            },
            register: RegisterState::default(),
            recovery: RecoveryState::default(),
            local,
            transactions: TransactionsState {
                store: TransactionStore::new(),
                ..TransactionsState::default()
            },
            bills: Vec::new(),
            bills_cursor: Cursor::default(),
            accounts: Vec::new(),
            accounts_cursor: Cursor::default(),
            accounts_pane: AccountsPane::default(),
            sessions: Vec::new(),
            sessions_cursor: Cursor::default(),
            alerts: Aggregator::new(config.debounce(), config.poll_interval()),
            alerts_cursor: Cursor::default(),
            prompt: None,
            palette: PaletteState::default(),
            toasts: ToastStack::default(),
            last_report: None,
            last_refresh: None,
            connected: true,
            tz,
            currency_symbol: config.currency_symbol.clone(),
            base_url: config.base_url.clone(),
        };

        Ok(Self {
            config,
            client,
            state,
            bus,
            events,
            tx,
            rx,
            last_input: Instant::now(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        if self.state.is_signed_in() {
            info!(user = self.state.username(), "resuming saved session");
            self.load_all(Trigger::Initial);
        }
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.last_input = Instant::now();
                        self.handle_key(key);
                    }
                }
            }

            while let Ok(msg) = self.rx.try_recv() {
                self.handle_msg(msg);
            }
            self.drain_events();
            self.on_tick(Instant::now());
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Msg> + Send + 'static,
    {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(task.await);
        });
    }

    fn drain_events(&mut self) {
        for event in self.events.drain() {
            match event {
                AppEvent::Toast(toast) => self.state.toasts.push(toast, Instant::now()),
                AppEvent::LoggedIn => self.request_alerts(Trigger::Login),
                AppEvent::TransactionsChanged => self.request_alerts(Trigger::TransactionsChanged),
                AppEvent::BillsChanged => {
                    self.reload_bills();
                    self.request_alerts(Trigger::BillsChanged);
                }
                AppEvent::AccountsChanged => {
                    self.reload_accounts();
                    self.request_alerts(Trigger::AccountsChanged);
                }
                AppEvent::BudgetChanged => self.request_alerts(Trigger::BudgetChanged),
            }
        }
    }

    fn on_tick(&mut self, now: Instant) {
        self.state.toasts.expire(now);
        if !self.state.is_signed_in() {
            return;
        }

        let timeout = self.config.inactivity_timeout();
        if !timeout.is_zero() && now.saturating_duration_since(self.last_input) >= timeout {
            info!("inactivity timeout");
            self.logout(Some(Toast::info("Logged out after inactivity")));
            return;
        }

        if let Some(ticket) = self.state.alerts.tick(now) {
            self.spawn_alert_fetch(ticket);
        }
    }

    fn toast(&self, toast: Toast) {
        self.bus.publish(AppEvent::Toast(toast));
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }

        if self.state.prompt.is_some() {
            self.handle_prompt_key(action);
            return;
        }
        if self.state.palette.active {
            self.handle_palette_key(action);
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(action),
            Screen::Register => self.handle_register_key(action),
            Screen::ForgotPassword => self.handle_recovery_key(action),
            Screen::Home => self.handle_home_key(action),
        }
    }

    fn handle_prompt_key(&mut self, action: AppAction) {
        let Some(prompt) = self.state.prompt.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.prompt = None,
            AppAction::Submit => self.submit_prompt(),
            AppAction::Backspace => {
                prompt.input.pop();
            }
            AppAction::Input(ch) => {
                prompt.input.push(ch);
                prompt.error = None;
            }
            _ => {}
        }
    }

    fn handle_palette_key(&mut self, action: AppAction) {
        let palette = &mut self.state.palette;
        match action {
            AppAction::Cancel | AppAction::TogglePalette => {
                *palette = PaletteState::default();
            }
            AppAction::Up => palette.selected = palette.selected.saturating_sub(1),
            AppAction::Down => {
                let len = PaletteCommand::filtered(&palette.query).len();
                if palette.selected + 1 < len {
                    palette.selected += 1;
                }
            }
            AppAction::Backspace => {
                palette.query.pop();
                palette.selected = 0;
            }
            AppAction::Input(ch) => {
                palette.query.push(ch);
                palette.selected = 0;
            }
            AppAction::Submit => {
                let commands = PaletteCommand::filtered(&palette.query);
                let chosen = commands.get(palette.selected).copied();
                *palette = PaletteState::default();
                if let Some(command) = chosen {
                    self.run_command(command);
                }
            }
            _ => {}
        }
    }

    fn handle_login_key(&mut self, action: AppAction) {
        let login = &mut self.state.login;
        match action {
            AppAction::NextField | AppAction::Up | AppAction::Down => {
                login.focus = match login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            AppAction::Submit => self.submit_login(),
            AppAction::SwitchAuth => {
                self.state.register = RegisterState::default();
                self.state.screen = Screen::Register;
            }
            AppAction::Recover => self.open_recovery(),
            AppAction::Backspace => {
                login_field(login).pop();
            }
            AppAction::Input(ch) => {
                login_field(login).push(ch);
            }
            AppAction::Cancel => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_register_key(&mut self, action: AppAction) {
        let register = &mut self.state.register;
        match action {
            AppAction::NextField | AppAction::Down => register.focus = register.focus.next(),
            AppAction::Submit => self.submit_register(),
            AppAction::SwitchAuth | AppAction::Cancel => self.state.screen = Screen::Login,
            AppAction::Backspace => {
                register.field_mut().pop();
            }
            AppAction::Input(ch) => register.field_mut().push(ch),
            _ => {}
        }
    }

    fn handle_recovery_key(&mut self, action: AppAction) {
        let recovery = &mut self.state.recovery;
        match action {
            AppAction::NextField | AppAction::Up | AppAction::Down => {
                if recovery.step == RecoveryStep::NewPassword {
                    recovery.confirm_focused = !recovery.confirm_focused;
                }
            }
            AppAction::Submit => self.submit_recovery(),
            AppAction::Cancel | AppAction::Recover => self.state.screen = Screen::Login,
            AppAction::Backspace => {
                recovery.field_mut().pop();
            }
            AppAction::Input(ch) => {
                recovery.field_mut().push(ch);
                recovery.message = None;
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, action: AppAction) {
        match action {
            AppAction::TogglePalette => self.state.palette.active = true,
            AppAction::NextField if self.state.section == Section::Accounts => {
                self.state.accounts_pane = self.state.accounts_pane.toggled();
            }
            AppAction::Up => self.move_cursor(false),
            AppAction::Down => self.move_cursor(true),
            AppAction::Submit if self.state.section == Section::Notifications => {
                self.mark_selected_alert_read();
            }
            AppAction::Input(ch) => self.handle_home_char(ch),
            _ => {}
        }
    }

    fn handle_home_char(&mut self, ch: char) {
        if let Some(section) = Section::from_shortcut(ch) {
            self.state.section = section;
            return;
        }
        let section = self.state.section;
        match (ch, section) {
            ('q', _) => self.should_quit = true,
            ('R', _) => self.run_command(PaletteCommand::Refresh),
            ('c', Section::Transactions | Section::Home) => {
                self.open_prompt(PromptKind::AddTransaction)
            }
            ('e', Section::Transactions) => self.start_edit_transaction(),
            ('d', Section::Transactions) => self.delete_selected_transaction(),
            ('f', Section::Transactions) => self.open_prompt(PromptKind::Filter),
            ('x', Section::Transactions) => self.run_command(PaletteCommand::ClearFilter),
            ('c', Section::Bills) => self.open_prompt(PromptKind::AddBill),
            ('e', Section::Bills) => self.start_edit_bill(),
            ('d', Section::Bills) => self.delete_selected_bill(),
            (_, Section::Accounts) => self.handle_accounts_char(ch),
            ('m', Section::Notifications) => self.mark_selected_alert_read(),
            ('g', Section::Home) => self.open_prompt(PromptKind::Budget),
            ('i', Section::Home) => self.open_prompt(PromptKind::Income),
            ('c', Section::Reports) => self.open_prompt(PromptKind::Report),
            _ => {}
        }
    }

    fn handle_accounts_char(&mut self, ch: char) {
        match (ch, self.state.accounts_pane) {
            ('c', AccountsPane::Accounts) => self.open_prompt(PromptKind::AddAccount),
            ('e', AccountsPane::Accounts) => self.start_edit_account(),
            ('d', AccountsPane::Accounts) => self.delete_selected_account(),
            ('d', AccountsPane::Sessions) => self.revoke_selected_session(),
            ('T', _) => self.open_prompt(PromptKind::Transfer),
            ('L', _) => self.logout_all_devices(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, down: bool) {
        let state = &mut self.state;
        match state.section {
            Section::Transactions => {
                if down {
                    state.transactions.select_next();
                } else {
                    state.transactions.select_prev();
                }
            }
            Section::Bills => step(&mut state.bills_cursor, down, state.bills.len()),
            Section::Accounts => match state.accounts_pane {
                AccountsPane::Accounts => {
                    step(&mut state.accounts_cursor, down, state.accounts.len())
                }
                AccountsPane::Sessions => {
                    step(&mut state.sessions_cursor, down, state.sessions.len())
                }
            },
            Section::Notifications => {
                step(&mut state.alerts_cursor, down, state.alerts.alerts().len())
            }
            Section::Home | Section::Reports => {}
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        self.state.prompt = Some(PromptState::new(kind));
    }

    fn run_command(&mut self, command: PaletteCommand) {
        match command {
            PaletteCommand::AddTransaction => self.open_prompt(PromptKind::AddTransaction),
            PaletteCommand::FilterTransactions => self.open_prompt(PromptKind::Filter),
            PaletteCommand::ClearFilter => {
                self.state.transactions.filter = Default::default();
                self.reload_transactions();
            }
            PaletteCommand::AddBill => self.open_prompt(PromptKind::AddBill),
            PaletteCommand::AddAccount => self.open_prompt(PromptKind::AddAccount),
            PaletteCommand::Transfer => self.open_prompt(PromptKind::Transfer),
            PaletteCommand::SetBudget => self.open_prompt(PromptKind::Budget),
            PaletteCommand::SetIncome => self.open_prompt(PromptKind::Income),
            PaletteCommand::DownloadReport => self.open_prompt(PromptKind::Report),
            PaletteCommand::Refresh => self.load_all(Trigger::Manual),
            PaletteCommand::ToggleTheme => {
                self.state.local.theme = self.state.local.theme.toggled();
                self.persist();
            }
            PaletteCommand::Logout => self.logout(Some(Toast::info("Logged out"))),
            PaletteCommand::LogoutAllDevices => self.logout_all_devices(),
        }
    }
}

fn login_field(login: &mut LoginState) -> &mut String {
    match login.focus {
        LoginField::Username => &mut login.username,
        LoginField::Password => &mut login.password,
    }
}

fn step(cursor: &mut Cursor, down: bool, len: usize) {
    if down {
        cursor.next(len);
    } else {
        cursor.prev();
    }
}
