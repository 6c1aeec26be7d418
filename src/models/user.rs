use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public account metadata for a GitHub user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub login: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub bio: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub created_at: DateTime<Utc>,
    pub html_url: String,
}

impl Profile {
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.login)
    }

    pub fn bio_or_default(&self) -> &str {
        self.bio
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or("No bio available")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub language: Option<String>,
    pub stargazers_count: u32,
    pub forks_count: u32,
    /// Size in kilobytes as reported by GitHub.
    pub size: u64,
    pub updated_at: DateTime<Utc>,
    pub default_branch: String,
    pub html_url: String,
}
