//! Task repository trait
//!
//! Defines the interface for task storage operations. The reminder
//! pipeline only reads through this interface; the due-window query
//! mirrors the store's composite filter (due date range plus a
//! not-completed condition).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::model::Task;
use crate::Result;

/// Repository interface for task storage
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// Get all tasks
    async fn list(&self) -> Result<Vec<Task>>;

    /// Find non-completed tasks whose due date falls within `[start, end]`,
    /// ordered by due date
    async fn find_due_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Task>>;
}
