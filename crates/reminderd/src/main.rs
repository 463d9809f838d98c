//! Reminder daemon for the Task Board backend
//!
//! Periodically sweeps the task store for tasks approaching their due
//! date and emails each assignee a reminder. The HTTP API and front-end
//! run elsewhere; this process only reads the stores and talks SMTP.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tb_core::reminder::{Dispatcher, ReminderService, SmtpMailer};
use tb_core::task::FileTaskStore;
use tb_core::team::FileTeamStore;
use tb_core::user::FileUserStore;

use crate::config::DaemonConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reminderd=debug,tb_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = DaemonConfig::from_env();
    tracing::info!("Using data directory: {:?}", config.data_dir);

    let tasks = Arc::new(
        FileTaskStore::new(config.data_dir.join("tasks.json"))
            .await
            .context("failed to open task store")?,
    );
    let users = Arc::new(
        FileUserStore::new(config.data_dir.join("users.json"))
            .await
            .context("failed to open user store")?,
    );
    let teams = Arc::new(
        FileTeamStore::new(config.data_dir.join("teams.json"))
            .await
            .context("failed to open team store")?,
    );

    let dispatcher = match (&config.smtp, config.reminders_enabled) {
        (Some(smtp), true) => {
            let mailer = SmtpMailer::new(smtp).context("failed to build SMTP mailer")?;
            tracing::info!(host = %smtp.host, "reminder delivery enabled via SMTP relay");
            Dispatcher::new(Arc::new(mailer))
        }
        _ => {
            tracing::info!("reminder delivery disabled; running in log-only mode");
            Dispatcher::log_only()
        }
    };

    let service = ReminderService::new(tasks, users, teams, dispatcher, config.reminder.clone());

    tracing::info!(
        interval_secs = config.check_interval.as_secs(),
        horizon_days = service.config().horizon_days,
        "reminder scheduler started"
    );

    // First tick fires immediately; one sweep runs right at startup.
    let mut interval = tokio::time::interval(config.check_interval);
    loop {
        interval.tick().await;
        match service.run_default_sweep().await {
            Ok(count) => tracing::info!(count, "reminder sweep finished"),
            Err(err) => tracing::error!(error = %err, "reminder sweep failed"),
        }
    }
}
