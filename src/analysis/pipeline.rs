use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};

use crate::analysis::merge::merge_commit_activity;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::github::GitHubSource;
use crate::models::{AggregateState, ProfileReport};

/// Fetches one profile and derives its aggregates.
pub struct AnalysisPipeline {
    github: Arc<dyn GitHubSource>,
    config: PipelineConfig,
    show_progress: bool,
}

impl AnalysisPipeline {
    pub fn new(github: Arc<dyn GitHubSource>, config: PipelineConfig) -> Self {
        Self {
            github,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub async fn analyze_user(&self, username: &str) -> Result<ProfileReport> {
        let pb = self.spinner(username);

        // Step 1: Profile
        pb.set_message(format!("{}: fetching profile", username));
        let profile = match self.github.get_user(username).await {
            Ok(profile) => profile,
            Err(e) => {
                pb.abandon_with_message(format!("{}: {}", username, e));
                return Err(e);
            }
        };

        // Step 2: Repositories
        pb.set_message(format!("{}: fetching repositories", username));
        let repositories = match self.github.get_user_repos(username).await {
            Ok(repos) => repos,
            Err(e) => {
                pb.abandon_with_message(format!("{}: {}", username, e));
                return Err(e);
            }
        };
        tracing::info!("Found {} repositories for {}", repositories.len(), username);

        // Step 3: Commit activity for the most recently updated repositories
        let sampled: Vec<_> = repositories
            .iter()
            .take(self.config.activity_sample_size)
            .collect();
        pb.set_message(format!(
            "{}: fetching commit activity for {} repositories",
            username,
            sampled.len()
        ));

        let activity_futures = sampled
            .iter()
            .map(|repo| self.github.get_commit_activity(username, &repo.name));
        let series = join_all(activity_futures).await;

        let with_data = series.iter().filter(|s| !s.is_empty()).count();
        if with_data < sampled.len() {
            tracing::debug!(
                "{} of {} sampled repositories returned no activity for {}",
                sampled.len() - with_data,
                sampled.len(),
                username
            );
        }

        // Step 4: Aggregate
        let merged = merge_commit_activity(&series);
        let aggregate = AggregateState::derive(&repositories, merged);

        pb.finish_with_message(format!("{}: analysis complete", username));

        Ok(ProfileReport {
            profile,
            repositories,
            aggregate,
            fetched_at: Utc::now(),
        })
    }

    fn spinner(&self, username: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("{}: starting", username));
        pb
    }
}
