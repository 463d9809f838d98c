//! Sweep orchestration
//!
//! One sweep: select due tasks, group per assignee, then run each
//! recipient's enrich/format/dispatch pipeline behind a bounded pool.
//! The sweep reports the number of due tasks found; delivery outcomes
//! are logged, not returned.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::info;
use uuid::Uuid;

use super::aggregator;
use super::dispatcher::{DeliveryOutcome, Dispatcher};
use super::enricher;
use super::formatter;
use super::mailer::OutgoingEmail;
use super::selector;
use crate::task::{Task, TaskRepository};
use crate::team::TeamRepository;
use crate::user::UserRepository;
use crate::Result;

/// Reminder pipeline configuration, resolved once at process start
#[derive(Debug, Clone)]
pub struct ReminderConfig {
    /// Base URL for the login link embedded in reminder emails
    pub app_url: String,
    /// Default horizon when the trigger does not supply one
    pub horizon_days: u32,
    /// Cap on concurrent in-flight recipient pipelines
    pub max_concurrent_recipients: usize,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            app_url: "http://localhost:3000".to_string(),
            horizon_days: 3,
            max_concurrent_recipients: 4,
        }
    }
}

/// The deadline reminder pipeline
pub struct ReminderService {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
    teams: Arc<dyn TeamRepository>,
    dispatcher: Dispatcher,
    config: ReminderConfig,
}

impl ReminderService {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        users: Arc<dyn UserRepository>,
        teams: Arc<dyn TeamRepository>,
        dispatcher: Dispatcher,
        config: ReminderConfig,
    ) -> Self {
        Self {
            tasks,
            users,
            teams,
            dispatcher,
            config,
        }
    }

    pub fn config(&self) -> &ReminderConfig {
        &self.config
    }

    /// Run one reminder sweep for the given horizon.
    ///
    /// Returns the number of due tasks found, independent of how many
    /// reminders were actually delivered. Only the due-task query can
    /// fail the sweep; every per-recipient failure is absorbed and
    /// logged.
    pub async fn run_sweep(&self, horizon_days: u32) -> Result<usize> {
        info!(horizon_days, "checking for upcoming task deadlines");

        let due_tasks = selector::select_due_tasks(self.tasks.as_ref(), horizon_days).await?;
        let total = due_tasks.len();
        info!(count = total, horizon_days, "found due tasks");

        if total == 0 {
            return Ok(0);
        }

        let grouped = aggregator::group_by_assignee(due_tasks);
        let outcomes: Vec<DeliveryOutcome> = stream::iter(grouped)
            .map(|(recipient_id, tasks)| self.notify_recipient(recipient_id, tasks, horizon_days))
            .buffer_unordered(self.config.max_concurrent_recipients.max(1))
            .collect()
            .await;

        let sent = outcomes.iter().filter(|o| **o == DeliveryOutcome::Sent).count();
        let skipped = outcomes
            .iter()
            .filter(|o| **o == DeliveryOutcome::Skipped)
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| **o == DeliveryOutcome::Failed)
            .count();
        info!(sent, skipped, failed, "reminder sweep completed");

        Ok(total)
    }

    /// Run one sweep with the configured default horizon
    pub async fn run_default_sweep(&self) -> Result<usize> {
        self.run_sweep(self.config.horizon_days).await
    }

    async fn notify_recipient(
        &self,
        recipient_id: Uuid,
        tasks: Vec<Task>,
        horizon_days: u32,
    ) -> DeliveryOutcome {
        let Some((user, enriched)) = enricher::enrich(
            self.users.as_ref(),
            self.teams.as_ref(),
            recipient_id,
            tasks,
        )
        .await
        else {
            return DeliveryOutcome::Skipped;
        };

        let Some(to) = user.email.clone() else {
            return DeliveryOutcome::Skipped;
        };

        let email = OutgoingEmail {
            to,
            subject: formatter::subject_line(enriched.len(), horizon_days),
            text: formatter::format_plain_text(&user, &enriched, horizon_days),
            html: formatter::format_html(&user, &enriched, horizon_days, &self.config.app_url),
        };

        self.dispatcher.dispatch(email).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::mailer::Mailer;
    use crate::reminder::selector::due_window;
    use crate::task::{FileTaskStore, TaskStatus};
    use crate::team::{FileTeamStore, Team};
    use crate::user::{FileUserStore, User};
    use crate::Error;
    use async_trait::async_trait;
    use chrono::{Duration, Local};
    use tempfile::TempDir;
    use tokio::sync::RwLock;

    /// Captures sent emails; optionally errors for specific recipients
    struct RecordingMailer {
        sent: RwLock<Vec<OutgoingEmail>>,
        fail_for: Vec<String>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: RwLock::new(Vec::new()),
                fail_for: Vec::new(),
            }
        }

        fn failing_for(address: &str) -> Self {
            Self {
                sent: RwLock::new(Vec::new()),
                fail_for: vec![address.to_string()],
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: OutgoingEmail) -> crate::Result<()> {
            if self.fail_for.contains(&email.to) {
                return Err(Error::Mail(format!("transport rejected {}", email.to)));
            }
            self.sent.write().await.push(email);
            Ok(())
        }
    }

    struct Fixture {
        tasks: Arc<FileTaskStore>,
        users: Arc<FileUserStore>,
        teams: Arc<FileTeamStore>,
        _temp: TempDir,
    }

    async fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        Fixture {
            tasks: Arc::new(
                FileTaskStore::new(temp.path().join("tasks.json"))
                    .await
                    .unwrap(),
            ),
            users: Arc::new(
                FileUserStore::new(temp.path().join("users.json"))
                    .await
                    .unwrap(),
            ),
            teams: Arc::new(
                FileTeamStore::new(temp.path().join("teams.json"))
                    .await
                    .unwrap(),
            ),
            _temp: temp,
        }
    }

    impl Fixture {
        fn service(&self, dispatcher: Dispatcher) -> ReminderService {
            ReminderService::new(
                self.tasks.clone(),
                self.users.clone(),
                self.teams.clone(),
                dispatcher,
                ReminderConfig::default(),
            )
        }
    }

    /// A due date inside tomorrow's window
    fn due_tomorrow() -> chrono::DateTime<chrono::Utc> {
        let (start, _) = due_window(Local::now().date_naive(), 1);
        start + Duration::hours(12)
    }

    #[tokio::test]
    async fn test_sweep_returns_zero_when_nothing_due() {
        let fx = fixture().await;
        let service = fx.service(Dispatcher::log_only());
        assert_eq!(service.run_sweep(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_counts_only_non_completed_tasks() {
        let fx = fixture().await;
        let user = fx
            .users
            .create(User::new().with_email("alice@example.com"))
            .await
            .unwrap();
        let creator = Uuid::new_v4();

        for title in ["First", "Second"] {
            fx.tasks
                .create(
                    Task::new(title, creator)
                        .with_assignee(user.id)
                        .with_due_date(due_tomorrow()),
                )
                .await
                .unwrap();
        }
        fx.tasks
            .create(
                Task::new("Already done", creator)
                    .with_assignee(user.id)
                    .with_due_date(due_tomorrow())
                    .with_status(TaskStatus::Completed),
            )
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::new());
        let service = fx.service(Dispatcher::new(mailer.clone()));

        assert_eq!(service.run_sweep(1).await.unwrap(), 2);

        let sent = mailer.sent.read().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "alice@example.com");
        assert_eq!(sent[0].subject, "Task Reminder: 2 task(s) due in 1 day(s)");
        assert!(sent[0].text.contains("First"));
        assert!(sent[0].text.contains("Second"));
        assert!(!sent[0].text.contains("Already done"));
    }

    #[tokio::test]
    async fn test_one_failing_recipient_does_not_abort_batch() {
        let fx = fixture().await;
        let creator = Uuid::new_v4();
        for name in ["one", "two", "three"] {
            let address = format!("{name}@example.com");
            let user = fx
                .users
                .create(User::new().with_email(&address))
                .await
                .unwrap();
            fx.tasks
                .create(
                    Task::new(format!("Task for {name}"), creator)
                        .with_assignee(user.id)
                        .with_due_date(due_tomorrow()),
                )
                .await
                .unwrap();
        }

        let mailer = Arc::new(RecordingMailer::failing_for("two@example.com"));
        let service = fx.service(Dispatcher::new(mailer.clone()));

        // Count is unaffected by the failed delivery
        assert_eq!(service.run_sweep(1).await.unwrap(), 3);

        let sent = mailer.sent.read().await;
        let mut delivered: Vec<&str> = sent.iter().map(|e| e.to.as_str()).collect();
        delivered.sort_unstable();
        assert_eq!(delivered, vec!["one@example.com", "three@example.com"]);
    }

    #[tokio::test]
    async fn test_recipient_without_email_is_skipped_but_counted() {
        let fx = fixture().await;
        let user = fx.users.create(User::new()).await.unwrap();
        fx.tasks
            .create(
                Task::new("Silent task", Uuid::new_v4())
                    .with_assignee(user.id)
                    .with_due_date(due_tomorrow()),
            )
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::new());
        let service = fx.service(Dispatcher::new(mailer.clone()));

        assert_eq!(service.run_sweep(1).await.unwrap(), 1);
        assert!(mailer.sent.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_transport_skips_all_but_returns_count() {
        let fx = fixture().await;
        let user = fx
            .users
            .create(User::new().with_email("alice@example.com"))
            .await
            .unwrap();
        fx.tasks
            .create(
                Task::new("Quiet task", Uuid::new_v4())
                    .with_assignee(user.id)
                    .with_due_date(due_tomorrow()),
            )
            .await
            .unwrap();

        let service = fx.service(Dispatcher::log_only());
        assert_eq!(service.run_sweep(1).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unassigned_due_task_is_counted_but_not_delivered() {
        let fx = fixture().await;
        fx.tasks
            .create(Task::new("Nobody's task", Uuid::new_v4()).with_due_date(due_tomorrow()))
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::new());
        let service = fx.service(Dispatcher::new(mailer.clone()));

        assert_eq!(service.run_sweep(1).await.unwrap(), 1);
        assert!(mailer.sent.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_sweep_message_carries_team_label() {
        let fx = fixture().await;
        let user = fx
            .users
            .create(User::new().with_email("bob@example.com").with_full_name("Bob"))
            .await
            .unwrap();
        let team = fx.teams.create(Team::new("Platform")).await.unwrap();
        fx.tasks
            .create(
                Task::new("Team task", Uuid::new_v4())
                    .with_assignee(user.id)
                    .with_team(team.id)
                    .with_due_date(due_tomorrow()),
            )
            .await
            .unwrap();

        let mailer = Arc::new(RecordingMailer::new());
        let service = fx.service(Dispatcher::new(mailer.clone()));
        service.run_sweep(1).await.unwrap();

        let sent = mailer.sent.read().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].text.contains("Hello Bob,"));
        assert!(sent[0].text.contains("[Team: Platform]"));
        assert!(sent[0].html.contains("[Team: Platform]"));
    }

    #[tokio::test]
    async fn test_default_sweep_uses_configured_horizon() {
        let fx = fixture().await;
        let user = fx
            .users
            .create(User::new().with_email("alice@example.com"))
            .await
            .unwrap();

        // Due inside the default 3-day horizon's window
        let (start, _) = due_window(Local::now().date_naive(), 3);
        fx.tasks
            .create(
                Task::new("Default horizon task", Uuid::new_v4())
                    .with_assignee(user.id)
                    .with_due_date(start + Duration::hours(6)),
            )
            .await
            .unwrap();

        let service = fx.service(Dispatcher::log_only());
        assert_eq!(service.config().horizon_days, 3);
        assert_eq!(service.run_default_sweep().await.unwrap(), 1);
    }
}
