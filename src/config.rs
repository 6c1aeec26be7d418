use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_url: String,
    pub activity_sample_size: usize,
    pub activity_max_attempts: u32,
    pub activity_retry_delay: Duration,
    pub capture_delay: Duration,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let github_token = env::var("GITHUB_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty());

        if github_token.is_none() {
            tracing::warn!("GITHUB_TOKEN not set, requests will be unauthenticated");
        }

        let api_url = env::var("GITHUB_API_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let activity_sample_size =
            parse_var("ACTIVITY_SAMPLE_SIZE", env::var("ACTIVITY_SAMPLE_SIZE").ok())?.unwrap_or(5);

        let activity_max_attempts =
            parse_var("ACTIVITY_MAX_ATTEMPTS", env::var("ACTIVITY_MAX_ATTEMPTS").ok())?
                .unwrap_or(3u32)
                .max(1);

        let activity_retry_delay =
            parse_var("ACTIVITY_RETRY_DELAY_MS", env::var("ACTIVITY_RETRY_DELAY_MS").ok())?
                .map(Duration::from_millis)
                .unwrap_or(Duration::from_secs(1));

        let capture_delay = parse_var("CAPTURE_DELAY_MS", env::var("CAPTURE_DELAY_MS").ok())?
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        let output_dir = env::var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            github_token,
            api_url,
            activity_sample_size,
            activity_max_attempts,
            activity_retry_delay,
            capture_delay,
            output_dir,
        })
    }
}

/// Parses an optional numeric setting; a value that is set but unreadable is an error.
fn parse_var<T: FromStr>(name: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", name, value))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            activity_sample_size: 5,
            activity_max_attempts: 3,
            activity_retry_delay: Duration::from_secs(1),
            capture_delay: Duration::from_secs(1),
            output_dir: PathBuf::from("."),
        }
    }
}

/// How often and how patiently the statistics endpoint is polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityPolicy {
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl Default for ActivityPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
        }
    }
}

impl From<&Config> for ActivityPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.activity_max_attempts.max(1),
            retry_delay: config.activity_retry_delay,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub activity_sample_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            activity_sample_size: 5,
        }
    }
}

impl From<&Config> for PipelineConfig {
    fn from(config: &Config) -> Self {
        Self {
            activity_sample_size: config.activity_sample_size,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub enabled: bool,
    pub delay: Duration,
    pub output_dir: PathBuf,
    pub copy_to_clipboard: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: Duration::from_secs(1),
            output_dir: PathBuf::from("."),
            copy_to_clipboard: false,
        }
    }
}

impl From<&Config> for CaptureConfig {
    fn from(config: &Config) -> Self {
        Self {
            enabled: true,
            delay: config.capture_delay,
            output_dir: config.output_dir.clone(),
            copy_to_clipboard: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_configs_follow_defaults() {
        let config = Config::default();

        let policy = ActivityPolicy::from(&config);
        assert_eq!(policy, ActivityPolicy::default());

        let pipeline = PipelineConfig::from(&config);
        assert_eq!(pipeline.activity_sample_size, 5);

        let capture = CaptureConfig::from(&config);
        assert_eq!(capture.delay, Duration::from_secs(1));
        assert!(!capture.copy_to_clipboard);
    }

    #[test]
    fn test_unreadable_number_is_config_error() {
        let err = parse_var::<u32>("ACTIVITY_MAX_ATTEMPTS", Some("three".to_string())).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("ACTIVITY_MAX_ATTEMPTS"));
    }

    #[test]
    fn test_missing_or_blank_number_uses_default() {
        assert_eq!(parse_var::<u64>("CAPTURE_DELAY_MS", None).unwrap(), None);
        assert_eq!(parse_var::<u64>("CAPTURE_DELAY_MS", Some("  ".to_string())).unwrap(), None);
        assert_eq!(parse_var::<u64>("CAPTURE_DELAY_MS", Some(" 250 ".to_string())).unwrap(), Some(250));
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let config = Config {
            activity_max_attempts: 0,
            ..Config::default()
        };
        assert_eq!(ActivityPolicy::from(&config).max_attempts, 1);
    }
}
