use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("User {0} not found")]
    UserNotFound(String),

    #[error("Failed to fetch repositories for {0}")]
    RepositoriesUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Capture failed: {0}")]
    Capture(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Profile and repository fetches must succeed for an analysis to be shown.
    pub fn is_mandatory_fetch(&self) -> bool {
        matches!(
            self,
            Error::UserNotFound(_) | Error::RepositoriesUnavailable(_)
        )
    }
}
