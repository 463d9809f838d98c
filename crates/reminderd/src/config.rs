//! Environment configuration for the reminder daemon
//!
//! All keys are resolved once at process start.

use std::path::PathBuf;
use std::time::Duration;

use tb_core::reminder::{ReminderConfig, SmtpSettings};

/// Daemon configuration resolved from the environment
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Directory holding the JSON stores
    pub data_dir: PathBuf,
    /// Delay between sweeps
    pub check_interval: Duration,
    /// Master switch for real delivery; off means log-only dispatch
    pub reminders_enabled: bool,
    /// SMTP transport settings; absent means log-only dispatch
    pub smtp: Option<SmtpSettings>,
    /// Pipeline configuration handed to the reminder service
    pub reminder: ReminderConfig,
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        let data_dir = env_var("TB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(".tb-data"));

        // A zero interval would panic in tokio::time::interval
        let check_interval = Duration::from_secs(
            env_var("REMINDER_INTERVAL_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(86_400)
                .max(1),
        );

        let defaults = ReminderConfig::default();
        let horizon_days = env_var("REMINDER_HORIZON_DAYS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.horizon_days);
        let app_url = env_var("APP_URL").unwrap_or(defaults.app_url);

        Self {
            data_dir,
            check_interval,
            reminders_enabled: env_flag("ENABLE_REMINDERS", false),
            smtp: Self::smtp_from_env(),
            reminder: ReminderConfig {
                app_url,
                horizon_days,
                max_concurrent_recipients: defaults.max_concurrent_recipients,
            },
        }
    }

    /// SMTP settings are all-or-nothing: host, username and password are
    /// required, the rest have defaults.
    fn smtp_from_env() -> Option<SmtpSettings> {
        let host = env_var("SMTP_HOST")?;
        let username = env_var("SMTP_USERNAME")?;
        let password = env_var("SMTP_PASSWORD")?;
        let port = env_var("SMTP_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(587);
        let from = env_var("SMTP_FROM").unwrap_or_else(|| format!("Task Board <{username}>"));
        Some(SmtpSettings {
            host,
            port,
            username,
            password,
            from,
        })
    }
}
