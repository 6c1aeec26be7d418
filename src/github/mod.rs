pub mod client;
pub mod retry;
pub mod source;

pub use client::GitHubClient;
pub use retry::{poll_until_ready, Attempt};
pub use source::GitHubSource;
