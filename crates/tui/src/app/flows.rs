//! Request flows: what is applied before a request is spawned and how its
//! completion is reconciled.

use std::{
    path::{Path, PathBuf},
    time::Instant,
};

use api_types::auth::{RegisterRequest, ResetPasswordRequest};
use chrono::{Local, Utc};
use engine::{
    AlertLevel, Applied, StoreAction, Ticket, Transaction, TransactionDetail, Trigger, YearMonth,
};
use tracing::{debug, error, info, warn};

use super::{
    AccountsPane, App, LoginField, Msg, PromptKind, PromptState, RecoveryState, RecoveryStep,
    Screen, state::validate_new_password,
};
use crate::{
    bus::AppEvent,
    client::{ClientError, ReportFile},
    local_state::Session,
    notifications::{self, MergeContext},
    quick_add,
    ui::components::toast::{Toast, ToastLevel},
};

impl App {
    pub(super) fn handle_msg(&mut self, msg: Msg) {
        match msg {
            Msg::LoggedIn(result) => self.on_logged_in(result),
            Msg::Registered(result) => match result {
                Ok(message) => {
                    self.state.screen = Screen::Login;
                    self.state.login.username = self.state.register.username.clone();
                    self.state.login.message = None;
                    self.toast(Toast::success(message));
                }
                Err(err) => self.state.register.message = Some(err.to_string()),
            },
            Msg::SecurityQuestion(result) => self.on_recovery_step(result, "User not found"),
            Msg::SecurityVerified(result) => {
                self.on_recovery_step(result.map(|()| String::new()), "Incorrect answer")
            }
            Msg::PasswordReset(result) => self.on_password_reset(result),
            Msg::SessionsLoaded(result) => {
                if !self.state.is_signed_in() {
                    return;
                }
                match result {
                    Ok(sessions) => {
                        self.state.sessions = sessions;
                        self.state.sessions_cursor.clamp(self.state.sessions.len());
                    }
                    Err(err) => self.fail("Failed to load sessions", err),
                }
            }
            Msg::SessionRevoked {
                id,
                this_device,
                result,
            } => match result {
                Ok(()) if this_device => {
                    self.logout_local(Some(Toast::info("This device was logged out")));
                }
                Ok(()) => {
                    self.state.sessions.retain(|session| session.id != id);
                    self.state.sessions_cursor.clamp(self.state.sessions.len());
                    self.toast(Toast::success("Device logged out"));
                }
                Err(err) => self.fail("Failed to log out device", err),
            },
            Msg::AllSessionsRevoked(result) => match result {
                Ok(()) => self.logout_local(Some(Toast::info("Logged out of all devices"))),
                Err(err) => self.fail("Failed to log out all devices", err),
            },
            Msg::TransactionsLoaded { seq, result } => {
                if seq != self.state.transactions.load_seq {
                    debug!(seq, "stale transaction list dropped");
                    return;
                }
                self.state.transactions.loading = false;
                match result {
                    Ok(items) => {
                        self.state.transactions.store.replace_all(items);
                        self.state.transactions.clamp_selection();
                        self.mark_refreshed();
                    }
                    Err(err) => self.fail("Failed to load transactions", err),
                }
            }
            Msg::TransactionAdded { temp_id, result } => match result {
                Ok(Some(transaction)) => {
                    self.state.transactions.store.apply(StoreAction::ReplaceTemp {
                        temp_id,
                        transaction,
                    });
                    self.toast(Toast::success("Transaction added"));
                    self.bus.publish(AppEvent::TransactionsChanged);
                }
                Ok(None) => {
                    self.state
                        .transactions
                        .store
                        .apply(StoreAction::RemoveTemp { temp_id });
                    self.toast(Toast::success("Transaction added"));
                    self.reload_transactions();
                    self.bus.publish(AppEvent::TransactionsChanged);
                }
                Err(err) => {
                    self.state
                        .transactions
                        .store
                        .apply(StoreAction::RemoveTemp { temp_id });
                    self.state.transactions.clamp_selection();
                    self.fail("Failed to add transaction", err);
                }
            },
            Msg::TransactionUpdated { previous, result } => match result {
                Ok(transaction) => {
                    self.state.transactions.store.apply(StoreAction::Update {
                        id: previous.id,
                        transaction,
                    });
                    self.toast(Toast::success("Transaction updated"));
                    self.bus.publish(AppEvent::TransactionsChanged);
                }
                Err(err) => {
                    self.state.transactions.store.apply(StoreAction::Update {
                        id: previous.id.clone(),
                        transaction: previous,
                    });
                    self.fail("Failed to update transaction", err);
                }
            },
            Msg::TransactionDeleted {
                index,
                previous,
                result,
            } => match result {
                Ok(()) => {
                    self.toast(Toast::success("Transaction deleted"));
                    self.bus.publish(AppEvent::TransactionsChanged);
                }
                Err(err) => {
                    self.state.transactions.store.apply(StoreAction::Restore {
                        index,
                        transaction: previous,
                    });
                    self.fail("Failed to delete transaction", err);
                }
            },
            Msg::BillsLoaded(result) => match result {
                Ok(bills) => {
                    self.state.bills = bills;
                    self.state.bills_cursor.clamp(self.state.bills.len());
                }
                Err(err) => self.fail("Failed to load bills", err),
            },
            Msg::BillChanged { success, result } => match result {
                Ok(()) => {
                    self.toast(Toast::success(success));
                    self.bus.publish(AppEvent::BillsChanged);
                }
                Err(err) => {
                    self.fail("Bill update failed", err);
                    self.reload_bills();
                }
            },
            Msg::AccountsLoaded(result) => match result {
                Ok(accounts) => {
                    self.state.accounts = accounts;
                    self.state.accounts_cursor.clamp(self.state.accounts.len());
                }
                Err(err) => self.fail("Failed to load accounts", err),
            },
            Msg::AccountChanged { success, result } => match result {
                Ok(()) => {
                    self.toast(Toast::success(success));
                    self.bus.publish(AppEvent::AccountsChanged);
                }
                Err(err) => self.fail("Account update failed", err),
            },
            Msg::Transferred(result) => match result {
                Ok(()) => {
                    self.toast(Toast::success("Transfer completed"));
                    self.reload_transactions();
                    self.bus.publish(AppEvent::AccountsChanged);
                    self.bus.publish(AppEvent::TransactionsChanged);
                }
                Err(err) => self.fail("Transfer failed", err),
            },
            Msg::AlertsFetched(fetched) => self.on_alerts_fetched(fetched),
            Msg::AlertMarked(result) => {
                if let Err(err) = result {
                    warn!("marking notification read failed: {err}");
                }
            }
            Msg::ReportSaved(result) => match result {
                Ok(Ok(path)) => {
                    let shown = path.display().to_string();
                    self.toast(Toast::success(format!("Report saved to {shown}")));
                    self.state.last_report = Some(shown);
                }
                Ok(Err(err)) => {
                    error!("writing report failed: {err}");
                    self.toast(Toast::error(format!("Could not save report: {err}")));
                }
                Err(err) => self.fail("Failed to download report", err),
            },
            Msg::Done => {}
        }
    }

    /// Reports a failed request. A 401 ends the session.
    fn fail(&mut self, context: &str, err: ClientError) {
        if err.is_unauthorized() {
            warn!("{context}: session rejected");
            self.logout_local(Some(Toast::error("Session expired, please log in again")));
            return;
        }
        self.state.connected = !matches!(err, ClientError::Transport(_));
        warn!("{context}: {err}");
        let message = match err {
            ClientError::Validation(msg) | ClientError::Conflict(msg) | ClientError::Server(msg) => {
                msg
            }
            other => format!("{context}: {other}"),
        };
        self.toast(Toast::error(message));
    }

    fn mark_refreshed(&mut self) {
        self.state.connected = true;
        self.state.last_refresh = Some(Local::now());
    }

    pub(super) fn persist(&self) {
        if let Err(err) = self.state.local.save(&self.config.state_path) {
            error!("saving local state failed: {err}");
        }
    }

    // --- session -----------------------------------------------------------

    pub(super) fn submit_login(&mut self) {
        let username = self.state.login.username.trim().to_string();
        let password = self.state.login.password.clone();
        if username.is_empty() || password.is_empty() {
            self.state.login.message = Some("Enter username and password.".to_string());
            return;
        }
        if self.state.login.pending {
            return;
        }
        self.state.login.pending = true;
        self.state.login.message = None;
        let client = self.client.clone();
        self.spawn(async move { Msg::LoggedIn(client.login(&username, &password).await) });
    }

    fn on_logged_in(&mut self, result: crate::client::ClientResult<api_types::auth::LoginResponse>) {
        self.state.login.pending = false;
        let login = match result {
            Ok(login) => login,
            Err(ClientError::Unauthorized) => {
                self.state.login.message = Some("Invalid username or password.".to_string());
                return;
            }
            Err(err) => {
                self.state.login.message = Some(err.to_string());
                return;
            }
        };

        info!(user = %login.username, "logged in");
        self.client.set_token(Some(login.token.clone()));
        self.state.local.session = Some(Session {
            token: login.token,
            username: login.username,
            user_id: login.user_id.unwrap_or_default(),
            session_id: login.session_id,
        });
        self.state.local.notifications.popped.clear();
        self.persist();

        self.state.login.password.clear();
        self.state.screen = Screen::Home;
        self.state.section = super::Section::Home;

        let client = self.client.clone();
        self.spawn(async move {
            if let Err(err) = client.check_due_reminders().await {
                warn!("reminder check failed: {err}");
            }
            Msg::Done
        });
        self.reload_transactions();
        self.reload_bills();
        self.reload_accounts();
        self.reload_sessions();
        self.bus.publish(AppEvent::LoggedIn);
        self.toast(Toast::success("Login successful"));
    }

    pub(super) fn submit_register(&mut self) {
        let form = &self.state.register;
        let missing = super::RegisterField::ALL
            .iter()
            .any(|field| form.value(*field).trim().is_empty());
        if missing {
            self.state.register.message = Some("All fields are required.".to_string());
            return;
        }
        if form.password != form.confirm {
            self.state.register.message = Some("Passwords do not match.".to_string());
            return;
        }
        let payload = RegisterRequest {
            username: form.username.trim().to_string(),
            password: form.password.clone(),
            confirm_password: form.confirm.clone(),
            security_question: form.question.trim().to_string(),
            security_answer: form.answer.trim().to_string(),
        };
        self.state.register.message = None;
        let client = self.client.clone();
        self.spawn(async move { Msg::Registered(client.register(&payload).await) });
    }

    /// Ends the session on the backend too; failures there are ignored.
    pub(super) fn logout(&mut self, toast: Option<Toast>) {
        if self.client.has_token() {
            let client = self.client.clone();
            self.spawn(async move {
                if let Err(err) = client.logout().await {
                    debug!("logout request failed: {err}");
                }
                Msg::Done
            });
        }
        self.logout_local(toast);
    }

    pub(super) fn logout_local(&mut self, toast: Option<Toast>) {
        info!("signing out");
        self.client.set_token(None);
        self.state.local.sign_out();
        self.persist();
        self.state.alerts.reset();
        self.state.transactions.store.clear();
        self.state.transactions.load_seq += 1;
        self.state.bills.clear();
        self.state.accounts.clear();
        self.state.sessions.clear();
        self.state.accounts_pane = AccountsPane::default();
        self.state.prompt = None;
        self.state.palette = Default::default();
        self.state.screen = Screen::Login;
        if let Some(toast) = toast {
            self.toast(toast);
        }
    }

    // --- password reset ----------------------------------------------------

    pub(super) fn open_recovery(&mut self) {
        self.state.recovery = RecoveryState {
            username: self.state.login.username.trim().to_string(),
            ..RecoveryState::default()
        };
        self.state.screen = Screen::ForgotPassword;
    }

    /// Sends the current step. Each step only runs once the previous one
    /// succeeded.
    pub(super) fn submit_recovery(&mut self) {
        if self.state.recovery.pending {
            return;
        }
        let form = &self.state.recovery;
        let username = form.username.trim().to_string();
        let client = self.client.clone();
        match form.step {
            RecoveryStep::Username => {
                if username.is_empty() {
                    self.state.recovery.message = Some("Enter your username.".to_string());
                    return;
                }
                self.spawn(async move {
                    Msg::SecurityQuestion(client.forgot_password(&username).await)
                });
            }
            RecoveryStep::Answer => {
                let answer = form.answer.trim().to_string();
                if answer.is_empty() {
                    self.state.recovery.message = Some("Enter your answer.".to_string());
                    return;
                }
                self.spawn(async move {
                    Msg::SecurityVerified(client.verify_security(&username, &answer).await)
                });
            }
            RecoveryStep::NewPassword => {
                if let Err(message) = validate_new_password(&form.new_password, &form.confirm) {
                    self.state.recovery.message = Some(message);
                    return;
                }
                let request = ResetPasswordRequest {
                    username,
                    new_password: form.new_password.clone(),
                    confirm_password: form.confirm.clone(),
                };
                self.spawn(async move {
                    Msg::PasswordReset(client.reset_password(&request).await)
                });
            }
        }
        self.state.recovery.pending = true;
        self.state.recovery.message = None;
    }

    /// Advances past the username or answer step. `question` is only read
    /// after the first step.
    fn on_recovery_step(&mut self, result: crate::client::ClientResult<String>, rejected: &str) {
        if self.state.screen != Screen::ForgotPassword {
            return;
        }
        let recovery = &mut self.state.recovery;
        recovery.pending = false;
        match result {
            Ok(question) => match recovery.step {
                RecoveryStep::Username => {
                    recovery.question = question;
                    recovery.step = RecoveryStep::Answer;
                }
                RecoveryStep::Answer => {
                    recovery.step = RecoveryStep::NewPassword;
                    recovery.confirm_focused = false;
                }
                RecoveryStep::NewPassword => {}
            },
            Err(err) => recovery.message = Some(recovery_message(err, rejected)),
        }
    }

    fn on_password_reset(&mut self, result: crate::client::ClientResult<()>) {
        if self.state.screen != Screen::ForgotPassword {
            return;
        }
        self.state.recovery.pending = false;
        if let Err(err) = result {
            self.state.recovery.message =
                Some(recovery_message(err, "Error resetting password"));
            return;
        }
        info!(user = %self.state.recovery.username, "password reset");
        let recovery = std::mem::take(&mut self.state.recovery);
        let login = &mut self.state.login;
        login.username = recovery.username;
        login.password.clear();
        login.focus = LoginField::Password;
        login.message = None;
        self.state.screen = Screen::Login;
        self.toast(Toast::success(
            "Password reset successfully! Please login with your new password.",
        ));
    }

    // --- device sessions ---------------------------------------------------

    pub(super) fn revoke_selected_session(&mut self) {
        let Some(session) = self.state.sessions.get(self.state.sessions_cursor.selected) else {
            return;
        };
        let this_device = self.state.is_this_device(session);
        let (client, id) = (self.client.clone(), session.id.clone());
        self.spawn(async move {
            let result = client.revoke_session(&id).await;
            Msg::SessionRevoked {
                id,
                this_device,
                result,
            }
        });
    }

    pub(super) fn logout_all_devices(&mut self) {
        if !self.state.is_signed_in() {
            return;
        }
        let client = self.client.clone();
        self.spawn(async move { Msg::AllSessionsRevoked(client.revoke_all_sessions().await) });
    }

    // --- loading -----------------------------------------------------------

    pub(super) fn load_all(&mut self, trigger: Trigger) {
        self.reload_transactions();
        self.reload_bills();
        self.reload_accounts();
        self.reload_sessions();
        self.request_alerts(trigger);
    }

    pub(super) fn reload_transactions(&mut self) {
        let txs = &mut self.state.transactions;
        txs.load_seq += 1;
        txs.loading = true;
        let seq = txs.load_seq;
        let query = txs.filter.clone();
        let client = self.client.clone();
        self.spawn(async move {
            Msg::TransactionsLoaded {
                seq,
                result: client.transactions(&query).await,
            }
        });
    }

    pub(super) fn reload_bills(&mut self) {
        let client = self.client.clone();
        self.spawn(async move { Msg::BillsLoaded(client.bills().await) });
    }

    pub(super) fn reload_accounts(&mut self) {
        let client = self.client.clone();
        self.spawn(async move { Msg::AccountsLoaded(client.accounts().await) });
    }

    pub(super) fn reload_sessions(&mut self) {
        let client = self.client.clone();
        self.spawn(async move { Msg::SessionsLoaded(client.sessions().await) });
    }

    // --- notifications -----------------------------------------------------

    pub(super) fn request_alerts(&mut self, trigger: Trigger) {
        if !self.state.is_signed_in() {
            return;
        }
        if let Some(ticket) = self.state.alerts.request(trigger, Instant::now()) {
            self.spawn_alert_fetch(ticket);
        }
    }

    pub(super) fn spawn_alert_fetch(&self, ticket: Ticket) {
        let client = self.client.clone();
        let tz = self.state.tz;
        self.spawn(async move {
            Msg::AlertsFetched(notifications::fetch(&client, ticket, Utc::now(), tz).await)
        });
    }

    fn on_alerts_fetched(&mut self, fetched: notifications::Fetched) {
        if !self.state.alerts.is_current(fetched.ticket) {
            debug!(ticket = fetched.ticket.value(), "superseded notification pass dropped");
            return;
        }
        if fetched.unauthorized {
            self.fail("Notifications", ClientError::Unauthorized);
            return;
        }
        let now = Utc::now();
        let budget = self.state.local.budget_for(fetched.month);
        let symbol = self.state.currency_symbol.clone();
        let ctx = MergeContext {
            budget,
            today: now.date_naive(),
            now,
            currency_symbol: &symbol,
        };
        let Some(popups) =
            self.state
                .alerts
                .apply(fetched, &mut self.state.local.notifications, ctx)
        else {
            return;
        };
        self.state.alerts_cursor.clamp(self.state.alerts.alerts().len());
        self.persist();
        for alert in popups {
            let level = match alert.level {
                AlertLevel::Urgent => ToastLevel::Error,
                AlertLevel::Warning => ToastLevel::Warning,
                AlertLevel::Info => ToastLevel::Info,
            };
            self.toast(Toast::new(level, alert.body).titled(alert.title));
        }
    }

    pub(super) fn mark_selected_alert_read(&mut self) {
        let index = self.state.alerts_cursor.selected;
        let Some(key) = self.state.alerts.alerts().get(index).map(|a| a.key.clone()) else {
            return;
        };
        let Some(alert) = self
            .state
            .alerts
            .mark_read(&key, &mut self.state.local.notifications)
        else {
            return;
        };
        self.state.alerts_cursor.clamp(self.state.alerts.alerts().len());
        self.persist();
        if !alert.is_synthetic() {
            let client = self.client.clone();
            self.spawn(async move {
                Msg::AlertMarked(client.mark_notification_read(alert.key.as_str()).await)
            });
        }
    }

    // --- prompt ------------------------------------------------------------

    pub(super) fn submit_prompt(&mut self) {
        let Some(prompt) = self.state.prompt.take() else {
            return;
        };
        if let Err(message) = self.dispatch_prompt(&prompt) {
            self.state.prompt = Some(PromptState {
                error: Some(message),
                ..prompt
            });
        }
    }

    fn dispatch_prompt(&mut self, prompt: &PromptState) -> Result<(), String> {
        let input = prompt.input.as_str();
        match &prompt.kind {
            PromptKind::AddTransaction => {
                let draft = quick_add::parse(input)?.into_draft(Utc::now())?;
                self.add_transaction(draft);
            }
            PromptKind::EditTransaction(id) => {
                let current = self
                    .state
                    .transactions
                    .store
                    .get(id)
                    .cloned()
                    .ok_or_else(|| "Transaction no longer exists.".to_string())?;
                let category = current.category().unwrap_or_default().to_string();
                let edit = quick_add::parse_edit(input, &category)?;
                current
                    .ensure_editable(Utc::now())
                    .map_err(|err| err.to_string())?;
                let optimistic = current.edited(&edit);
                self.state.transactions.store.apply(StoreAction::Update {
                    id: current.id.clone(),
                    transaction: optimistic,
                });
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client.update_transaction(&current.id, &edit).await;
                    Msg::TransactionUpdated {
                        previous: current,
                        result,
                    }
                });
            }
            PromptKind::Filter => {
                self.state.transactions.filter = quick_add::parse_filter(input)?;
                self.state.transactions.selected = 0;
                self.reload_transactions();
            }
            PromptKind::AddBill => {
                let bill = quick_add::parse_bill(input)?;
                let client = self.client.clone();
                self.spawn(async move {
                    let result = client
                        .add_bill(&bill.name, bill.amount, bill.due_date)
                        .await
                        .map(|_| ());
                    Msg::BillChanged {
                        success: "Reminder added",
                        result,
                    }
                });
            }
            PromptKind::EditBill(id) => {
                let bill = quick_add::parse_bill(input)?;
                let (client, id) = (self.client.clone(), id.clone());
                self.spawn(async move {
                    let result = match client.delete_bill(&id).await {
                        Ok(()) => client
                            .add_bill(&bill.name, bill.amount, bill.due_date)
                            .await
                            .map(|_| ()),
                        Err(err) => Err(err),
                    };
                    Msg::BillChanged {
                        success: "Reminder updated",
                        result,
                    }
                });
            }
            PromptKind::AddAccount => {
                let draft = quick_add::parse_account(input)?;
                let client = self.client.clone();
                self.spawn(async move {
                    Msg::AccountChanged {
                        success: "Account added",
                        result: client.add_account(&draft).await,
                    }
                });
            }
            PromptKind::EditAccount(id) => {
                let draft = quick_add::parse_account(input)?;
                let (client, id) = (self.client.clone(), id.clone());
                self.spawn(async move {
                    Msg::AccountChanged {
                        success: "Account updated",
                        result: client.update_account(&id, &draft).await,
                    }
                });
            }
            PromptKind::Transfer => {
                let request = quick_add::parse_transfer(input)?;
                let client = self.client.clone();
                self.spawn(async move { Msg::Transferred(client.transfer(&request).await) });
            }
            PromptKind::Budget => {
                let amount = quick_add::parse_optional_amount(input)?;
                let month = self.current_month();
                self.state.local.set_budget(month, amount);
                self.persist();
                self.toast(Toast::success(match amount {
                    Some(_) => "Budget saved",
                    None => "Budget cleared",
                }));
                self.bus.publish(AppEvent::BudgetChanged);
            }
            PromptKind::Income => {
                let amount = quick_add::parse_optional_amount(input)?;
                let month = self.current_month();
                self.state.local.set_income(month, amount);
                self.persist();
                self.toast(Toast::success(match amount {
                    Some(_) => "Income saved",
                    None => "Income cleared",
                }));
            }
            PromptKind::Report => {
                let (kind, request) = quick_add::parse_report(input)?;
                let client = self.client.clone();
                let dir = PathBuf::from(&self.config.reports_dir);
                self.spawn(async move {
                    let result = match client.report(kind, &request).await {
                        Ok(file) => Ok(save_report(&dir, &file).await),
                        Err(err) => Err(err),
                    };
                    Msg::ReportSaved(result)
                });
            }
        }
        Ok(())
    }

    pub(super) fn current_month(&self) -> YearMonth {
        YearMonth::of(&Utc::now().with_timezone(&self.state.tz))
    }

    // --- transactions ------------------------------------------------------

    pub(super) fn add_transaction(&mut self, draft: engine::TransactionDraft) {
        let provisional = Transaction::provisional(&draft);
        let temp_id = provisional.id.clone();
        self.state
            .transactions
            .store
            .apply(StoreAction::Add(provisional));
        self.state.transactions.selected = 0;
        let client = self.client.clone();
        self.spawn(async move {
            Msg::TransactionAdded {
                temp_id,
                result: client.add_transaction(&draft).await,
            }
        });
    }

    pub(super) fn start_edit_transaction(&mut self) {
        let Some(tx) = self.selected_transaction().cloned() else {
            return;
        };
        if let Err(message) = editable(&tx) {
            self.toast(Toast::error(message));
            return;
        }
        let category = tx.category().unwrap_or_default();
        let input = format!("{} #{category}", tx.amount);
        self.state.prompt = Some(PromptState::with_input(
            PromptKind::EditTransaction(tx.id),
            input,
        ));
    }

    pub(super) fn delete_selected_transaction(&mut self) {
        let Some(tx) = self.selected_transaction() else {
            return;
        };
        if tx.is_provisional() {
            self.toast(Toast::error("Still saving, try again in a moment"));
            return;
        }
        let id = tx.id.clone();
        let Applied::Removed { index, previous } = self
            .state
            .transactions
            .store
            .apply(StoreAction::Delete { id: id.clone() })
        else {
            return;
        };
        self.state.transactions.clamp_selection();
        let client = self.client.clone();
        self.spawn(async move {
            let result = client.delete_transaction(&id).await;
            Msg::TransactionDeleted {
                index,
                previous,
                result,
            }
        });
    }

    fn selected_transaction(&self) -> Option<&Transaction> {
        let txs = &self.state.transactions;
        txs.store.items().get(txs.selected)
    }

    // --- bills & accounts --------------------------------------------------

    pub(super) fn start_edit_bill(&mut self) {
        let Some(bill) = self.state.bills.get(self.state.bills_cursor.selected) else {
            return;
        };
        let input = format!("{} {} {}", bill.name, bill.amount, bill.due_date.format("%Y-%m-%d"));
        self.state.prompt = Some(PromptState::with_input(
            PromptKind::EditBill(bill.id.clone()),
            input,
        ));
    }

    pub(super) fn delete_selected_bill(&mut self) {
        let Some(bill) = self.state.bills.get(self.state.bills_cursor.selected) else {
            return;
        };
        let (client, id) = (self.client.clone(), bill.id.clone());
        self.spawn(async move {
            Msg::BillChanged {
                success: "Reminder deleted",
                result: client.delete_bill(&id).await,
            }
        });
    }

    pub(super) fn start_edit_account(&mut self) {
        let Some(account) = self.state.accounts.get(self.state.accounts_cursor.selected) else {
            return;
        };
        let input = format!(
            "{} {} {}",
            account.name, account.account_number, account.balance
        );
        self.state.prompt = Some(PromptState::with_input(
            PromptKind::EditAccount(account.id.clone()),
            input,
        ));
    }

    pub(super) fn delete_selected_account(&mut self) {
        let Some(account) = self.state.accounts.get(self.state.accounts_cursor.selected) else {
            return;
        };
        let (client, id) = (self.client.clone(), account.id.clone());
        self.spawn(async move {
            Msg::AccountChanged {
                success: "Account deleted",
                result: client.delete_account(&id).await,
            }
        });
    }
}

/// Text shown on the reset form for a failed step.
fn recovery_message(err: ClientError, rejected: &str) -> String {
    match err {
        ClientError::Validation(msg) | ClientError::Conflict(msg) | ClientError::Server(msg) => msg,
        ClientError::Transport(_) => "Connection error. Please try again.".to_string(),
        _ => rejected.to_string(),
    }
}

/// Local checks run before an edit prompt opens.
fn editable(tx: &Transaction) -> Result<(), String> {
    if tx.is_provisional() {
        return Err("Still saving, try again in a moment".to_string());
    }
    if matches!(tx.detail, TransactionDetail::Transfer { .. }) {
        return Err("Transfers cannot be edited".to_string());
    }
    tx.ensure_editable(Utc::now()).map_err(|err| err.to_string())
}

/// Writes the report under `dir`, keeping only the file name the server sent.
async fn save_report(dir: &Path, file: &ReportFile) -> std::io::Result<PathBuf> {
    let name = Path::new(&file.filename)
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "report".into());
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, &file.bytes).await?;
    Ok(path)
}
