use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::time::sleep;

use crate::analysis::AnalysisPipeline;
use crate::capture::{self, CaptureArtifact};
use crate::config::{CaptureConfig, PipelineConfig};
use crate::error::{Error, Result};
use crate::github::GitHubSource;
use crate::session::state::{Mode, Phase, Session, SessionEvent};
use crate::session::store::SessionStore;

/// Drives one Analyze or Compare run from fetch to capture.
pub struct Analyzer {
    pipeline: AnalysisPipeline,
    capture: CaptureConfig,
}

impl Analyzer {
    pub fn new(
        github: Arc<dyn GitHubSource>,
        pipeline_config: PipelineConfig,
        capture: CaptureConfig,
    ) -> Self {
        Self {
            pipeline: AnalysisPipeline::new(github, pipeline_config),
            capture,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.pipeline = self.pipeline.with_progress(show_progress);
        self
    }

    pub async fn run(&self, mode: Mode) -> Session {
        let store = SessionStore::new();
        self.run_in(&store, mode).await
    }

    /// Runs against a shared store. A newer `begin` on the same store makes
    /// every remaining event of this run stale.
    pub async fn run_in(&self, store: &SessionStore, mode: Mode) -> Session {
        let generation = store.begin(mode.clone()).await;
        tracing::info!("Analysis {} started for {:?}", generation, mode.usernames());

        let mut pending: FuturesUnordered<_> = mode
            .usernames()
            .into_iter()
            .enumerate()
            .map(|(slot, username)| {
                let pipeline = &self.pipeline;
                let username = username.to_string();
                async move { (slot, pipeline.analyze_user(&username).await) }
            })
            .collect();

        let mut session = store.snapshot().await;
        while let Some((slot, result)) = pending.next().await {
            let event = match result {
                Ok(report) => SessionEvent::ProfileLoaded {
                    generation,
                    slot,
                    report: Box::new(report),
                },
                Err(e) => {
                    if e.is_mandatory_fetch() {
                        tracing::warn!("Analysis failed for slot {}: {}", slot, e);
                    } else {
                        tracing::error!("Analysis failed for slot {}: {}", slot, e);
                    }
                    SessionEvent::ProfileFailed {
                        generation,
                        slot,
                        message: e.to_string(),
                    }
                }
            };
            session = store.dispatch(event).await;
        }

        if session.generation() != generation || session.phase() != Phase::Ready {
            return session;
        }

        if !self.capture.enabled {
            tracing::debug!("Capture disabled, leaving session ready");
            return session;
        }

        // Give the rendered report time to settle before it is captured.
        sleep(self.capture.delay).await;

        let session = store
            .dispatch(SessionEvent::CaptureStarted { generation })
            .await;
        if session.phase() != Phase::Capturing || session.generation() != generation {
            return session;
        }

        let artifact = match self.capture_session(session).await {
            Ok(artifact) => {
                tracing::info!("Report captured to {}", artifact.path.display());
                Some(artifact)
            }
            Err(e) => {
                tracing::error!("Error capturing report: {}", e);
                None
            }
        };

        store
            .dispatch(SessionEvent::CaptureFinished {
                generation,
                artifact,
            })
            .await
    }

    async fn capture_session(&self, session: Session) -> Result<CaptureArtifact> {
        let config = self.capture.clone();
        tokio::task::spawn_blocking(move || capture::capture_session(&session, &config))
            .await
            .map_err(|e| Error::Capture(e.to_string()))?
    }
}
