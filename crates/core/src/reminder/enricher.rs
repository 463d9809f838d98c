//! Recipient and team-name enrichment
//!
//! Resolves the recipient's profile and each task's team label before
//! formatting. Enrichment degrades instead of failing: a missing or
//! email-less recipient skips that recipient only, and a failed team
//! lookup leaves the task without a team label.

use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::task::Task;
use crate::team::TeamRepository;
use crate::user::{User, UserRepository};

/// A task joined with its resolved team label, ready for rendering
#[derive(Debug, Clone)]
pub struct EnrichedTask {
    pub task: Task,
    pub team_name: Option<String>,
}

/// Resolve the recipient and enrich their tasks with team labels.
///
/// Returns `None` when the recipient cannot be notified (not found,
/// lookup failed, or no email on file). Team lookups run concurrently
/// and all complete before this returns, so rendering never races a
/// lookup.
pub async fn enrich(
    users: &dyn UserRepository,
    teams: &dyn TeamRepository,
    recipient_id: Uuid,
    tasks: Vec<Task>,
) -> Option<(User, Vec<EnrichedTask>)> {
    let user = match users.get(recipient_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            warn!(%recipient_id, "assignee not found; skipping reminder");
            return None;
        }
        Err(err) => {
            warn!(%recipient_id, error = %err, "assignee lookup failed; skipping reminder");
            return None;
        }
    };

    if user.email.is_none() {
        warn!(%recipient_id, "assignee has no email on file; skipping reminder");
        return None;
    }

    let enriched = join_all(tasks.into_iter().map(|task| async move {
        let team_name = match task.team_id {
            Some(team_id) => resolve_team_name(teams, team_id, task.id).await,
            None => None,
        };
        EnrichedTask { task, team_name }
    }))
    .await;

    Some((user, enriched))
}

async fn resolve_team_name(
    teams: &dyn TeamRepository,
    team_id: Uuid,
    task_id: Uuid,
) -> Option<String> {
    match teams.get(team_id).await {
        Ok(Some(team)) => Some(team.name),
        Ok(None) => {
            debug!(%team_id, %task_id, "team not found; task rendered without team label");
            None
        }
        Err(err) => {
            warn!(%team_id, %task_id, error = %err, "team lookup failed; task rendered without team label");
            None
        }
    }
}
