//! File-based team storage implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::Team;
use super::repository::TeamRepository;
use crate::{Error, Result};

/// File-based team store using JSON
pub struct FileTeamStore {
    path: PathBuf,
    cache: RwLock<HashMap<Uuid, Team>>,
}

impl FileTeamStore {
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let cache = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            let teams: Vec<Team> = serde_json::from_str(&content)?;
            teams.into_iter().map(|t| (t.id, t)).collect()
        } else {
            HashMap::new()
        };

        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    async fn persist(&self) -> Result<()> {
        let cache = self.cache.read().await;
        let teams: Vec<&Team> = cache.values().collect();
        let content = serde_json::to_string_pretty(&teams)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for FileTeamStore {
    async fn create(&self, team: Team) -> Result<Team> {
        {
            let mut cache = self.cache.write().await;
            if cache.contains_key(&team.id) {
                return Err(Error::InvalidInput(format!(
                    "Team with ID {} already exists",
                    team.id
                )));
            }
            cache.insert(team.id, team.clone());
        }
        self.persist().await?;
        Ok(team)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Team>> {
        let cache = self.cache.read().await;
        Ok(cache.get(&id).cloned())
    }
}
