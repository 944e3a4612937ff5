use std::time::Duration;

use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub username: String,
    pub timezone: String,
    pub state_path: String,
    pub log_path: String,
    pub level: String,
    pub poll_interval_secs: u64,
    pub debounce_millis: u64,
    pub inactivity_timeout_secs: u64,
    pub reports_dir: String,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            username: String::new(),
            timezone: "Asia/Kolkata".to_string(),
            state_path: "config/tally_state.json".to_string(),
            log_path: "tally.log".to_string(),
            level: "info".to_string(),
            poll_interval_secs: 30,
            debounce_millis: 300,
            inactivity_timeout_secs: 300,
            reports_dir: "reports".to_string(),
            currency_symbol: "₹".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_millis)
    }

    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

#[derive(Debug, Parser)]
#[command(name = "tally", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:5000).
    #[arg(long)]
    base_url: Option<String>,
    /// Override username (password is never read from CLI).
    #[arg(long)]
    username: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    /// Override local state file path.
    #[arg(long)]
    state: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut settings = from_sources(config_path)?;

    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    if let Some(username) = args.username {
        settings.username = username;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }
    if let Some(state) = args.state {
        settings.state_path = state;
    }
    settings.tz()?;

    Ok(settings)
}

fn from_sources(config_path: &str) -> Result<AppConfig> {
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("TALLY"));
    Ok(builder.build()?.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let settings = from_sources("does/not/exist").unwrap();
        assert_eq!(settings.poll_interval(), Duration::from_secs(30));
        assert_eq!(settings.debounce(), Duration::from_millis(300));
        assert_eq!(settings.inactivity_timeout(), Duration::from_secs(300));
        assert!(settings.tz().is_ok());
    }

    #[test]
    fn bad_timezone_is_rejected() {
        let settings = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(settings.tz(), Err(AppError::Timezone(_))));
    }
}
