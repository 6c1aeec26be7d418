use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};

use crate::config::{ActivityPolicy, Config, DEFAULT_API_URL};
use crate::error::{Error, Result};
use crate::github::retry::{poll_until_ready, Attempt};
use crate::github::source::GitHubSource;
use crate::models::{Profile, Repository, WeeklyActivity};

const REPOS_PER_PAGE: u32 = 100;

pub struct GitHubClient {
    client: Client,
    base_url: String,
    activity_policy: ActivityPolicy,
}

impl GitHubClient {
    pub fn new(token: Option<&str>) -> Result<Self> {
        Self::with_base_url(token, DEFAULT_API_URL)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::with_base_url(config.github_token.as_deref(), &config.api_url)?
            .with_activity_policy(ActivityPolicy::from(config)))
    }

    pub fn with_base_url(token: Option<&str>, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = token {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", token))?,
            );
        }
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("gitprofile/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            activity_policy: ActivityPolicy::default(),
        })
    }

    pub fn with_activity_policy(mut self, policy: ActivityPolicy) -> Self {
        self.activity_policy = policy;
        self
    }

    pub fn activity_policy(&self) -> ActivityPolicy {
        self.activity_policy
    }

    async fn activity_attempt(&self, url: &str) -> Attempt<Vec<WeeklyActivity>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Commit activity request failed: {}", e);
                return Attempt::Abort;
            }
        };

        match response.status() {
            StatusCode::ACCEPTED => Attempt::Pending,
            status if status.is_success() => {
                // Anything other than an array of weeks counts as an empty series.
                match response.json::<Vec<WeeklyActivity>>().await {
                    Ok(weeks) => Attempt::Ready(weeks),
                    Err(e) => {
                        tracing::debug!("Malformed commit activity at {}: {}", url, e);
                        Attempt::Ready(Vec::new())
                    }
                }
            }
            status => {
                tracing::debug!("Commit activity at {} returned {}", url, status);
                Attempt::Failed
            }
        }
    }
}

#[async_trait]
impl GitHubSource for GitHubClient {
    async fn get_user(&self, username: &str) -> Result<Profile> {
        let url = format!("{}/users/{}", self.base_url, username);
        tracing::info!("Fetching user: {}", username);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::debug!("User request for {} failed: {}", username, e);
            Error::UserNotFound(username.to_string())
        })?;

        if !response.status().is_success() {
            tracing::debug!("User fetch for {} returned {}", username, response.status());
            return Err(Error::UserNotFound(username.to_string()));
        }

        response.json().await.map_err(|e| {
            tracing::debug!("Unreadable profile for {}: {}", username, e);
            Error::UserNotFound(username.to_string())
        })
    }

    async fn get_user_repos(&self, username: &str) -> Result<Vec<Repository>> {
        let url = format!(
            "{}/users/{}/repos?per_page={}&sort=updated",
            self.base_url, username, REPOS_PER_PAGE
        );
        tracing::info!("Fetching repositories for: {}", username);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::debug!("Repository request for {} failed: {}", username, e);
            Error::RepositoriesUnavailable(username.to_string())
        })?;

        if !response.status().is_success() {
            tracing::debug!("Repository fetch for {} returned {}", username, response.status());
            return Err(Error::RepositoriesUnavailable(username.to_string()));
        }

        response.json().await.map_err(|e| {
            tracing::debug!("Unreadable repository list for {}: {}", username, e);
            Error::RepositoriesUnavailable(username.to_string())
        })
    }

    async fn get_commit_activity(&self, owner: &str, repo: &str) -> Vec<WeeklyActivity> {
        let url = format!(
            "{}/repos/{}/{}/stats/commit_activity",
            self.base_url, owner, repo
        );
        tracing::debug!("Fetching commit activity: {}/{}", owner, repo);

        let weeks = poll_until_ready(self.activity_policy, |_| self.activity_attempt(&url)).await;

        if weeks.is_none() {
            tracing::warn!("No commit activity for {}/{}, using empty series", owner, repo);
        }
        weeks.unwrap_or_default()
    }
}
