pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod analysis;
pub mod session;
pub mod render;
pub mod capture;

pub use config::{ActivityPolicy, CaptureConfig, Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, GitHubSource};
pub use analysis::AnalysisPipeline;
pub use session::{Analyzer, Mode, Phase, Session, SessionStore};
