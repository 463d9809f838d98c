//! Per-recipient aggregation of due tasks

use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::task::Task;

/// Group tasks by assignee, preserving the store's return order within
/// each group.
///
/// Tasks without an assignee cannot be notified to anyone and are
/// dropped from the batch with a warning.
pub fn group_by_assignee(tasks: Vec<Task>) -> HashMap<Uuid, Vec<Task>> {
    let mut grouped: HashMap<Uuid, Vec<Task>> = HashMap::new();
    for task in tasks {
        match task.assigned_to {
            Some(assignee) => grouped.entry(assignee).or_default().push(task),
            None => {
                warn!(task_id = %task.id, title = %task.title, "due task has no assignee; skipping");
            }
        }
    }
    grouped
}
