//! Team repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::model::Team;
use crate::Result;

/// Repository interface for team storage
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team>;

    /// Get a team by ID
    async fn get(&self, id: Uuid) -> Result<Option<Team>>;
}
