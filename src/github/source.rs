use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Profile, Repository, WeeklyActivity};

/// Read access to the three GitHub endpoints an analysis needs.
#[async_trait]
pub trait GitHubSource: Send + Sync {
    async fn get_user(&self, username: &str) -> Result<Profile>;

    /// Up to 100 repositories, most recently updated first.
    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>>;

    /// Never fails: an unavailable series is returned as empty.
    async fn get_commit_activity(&self, owner: &str, repo: &str) -> Vec<WeeklyActivity>;
}
