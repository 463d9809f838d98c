//! User repository trait

use async_trait::async_trait;
use uuid::Uuid;

use super::model::User;
use crate::Result;

/// Repository interface for user storage
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: User) -> Result<User>;

    /// Get a user by ID
    async fn get(&self, id: Uuid) -> Result<Option<User>>;
}
