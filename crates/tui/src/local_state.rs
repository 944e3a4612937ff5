use std::{collections::BTreeMap, fs, path::Path};

use engine::{Money, NotificationLedger, YearMonth};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Everything the client keeps between runs, stored as one JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LocalState {
    pub session: Option<Session>,
    /// Monthly budget per `YYYY-M`.
    pub budgets: BTreeMap<String, Money>,
    /// Monthly income override per `YYYY-M`.
    pub incomes: BTreeMap<String, Money>,
    pub theme: ThemePreference,
    pub notifications: NotificationLedger,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
    pub user_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Dark,
    Light,
}

impl ThemePreference {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let parent = Path::new(path).parent();
        if let Some(parent) = parent {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload)?;
        Ok(())
    }

    pub fn budget_for(&self, month: YearMonth) -> Option<Money> {
        self.budgets
            .get(&month.to_string())
            .copied()
            .filter(|b| b.is_positive())
    }

    /// `None` clears the entry.
    pub fn set_budget(&mut self, month: YearMonth, budget: Option<Money>) {
        set_or_clear(&mut self.budgets, month, budget);
    }

    pub fn income_for(&self, month: YearMonth) -> Option<Money> {
        self.incomes.get(&month.to_string()).copied()
    }

    pub fn set_income(&mut self, month: YearMonth, income: Option<Money>) {
        set_or_clear(&mut self.incomes, month, income);
    }

    /// Drops the session and everything cached about its notifications.
    /// Budgets and the theme stay.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.notifications = NotificationLedger::default();
    }
}

fn set_or_clear(map: &mut BTreeMap<String, Money>, month: YearMonth, value: Option<Money>) {
    match value {
        Some(value) => {
            map.insert(month.to_string(), value);
        }
        None => {
            map.remove(&month.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use engine::{Alert, AlertKey};

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("tally-state-{}-{name}", std::process::id()));
        dir.join("state.json").to_string_lossy().into_owned()
    }

    #[test]
    fn missing_file_loads_default() {
        let state = LocalState::load(&temp_path("missing")).unwrap();
        assert_eq!(state, LocalState::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("round-trip");
        let month = YearMonth::new(2026, 2);
        let mut state = LocalState::default();
        state.session = Some(Session {
            token: "t".to_string(),
            username: "asha".to_string(),
            user_id: "u1".to_string(),
            session_id: Some("s1".to_string()),
        });
        state.set_budget(month, Some(Money::from_major(10_000)));
        state.theme = ThemePreference::Light;
        state.save(&path).unwrap();

        let loaded = LocalState::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.budget_for(month), Some(Money::from_major(10_000)));
        assert_eq!(loaded.budget_for(YearMonth::new(2026, 3)), None);
    }

    #[test]
    fn sign_out_forgets_notifications() {
        let month = YearMonth::new(2026, 2);
        let mut state = LocalState::default();
        state.set_budget(month, Some(Money::from_major(500)));
        let alert = Alert::server("n1", "Salary credited", "", Utc::now(), false);
        state.notifications.cached.push(alert);
        state.notifications.read.insert(AlertKey::new("n2"));

        state.sign_out();
        assert!(state.session.is_none());
        assert_eq!(state.notifications, NotificationLedger::default());
        assert_eq!(state.budget_for(month), Some(Money::from_major(500)));
    }

    #[test]
    fn clearing_budget_removes_key() {
        let month = YearMonth::new(2026, 2);
        let mut state = LocalState::default();
        state.set_budget(month, Some(Money::from_major(1)));
        state.set_budget(month, None);
        assert!(state.budgets.is_empty());
    }
}
