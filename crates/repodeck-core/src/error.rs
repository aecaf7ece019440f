use repodeck_api::GitHubError;
use thiserror::Error;

/// All the ways a gateway call or config load can go wrong.
///
/// The favorites store never produces one of these; its operations are
/// total.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Rate limit exceeded, try again later")]
    RateLimitExceeded,

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid repository record: {0}")]
    InvalidRecord(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<GitHubError> for Error {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::EmptyQuery => Error::EmptyQuery,
            GitHubError::RateLimitExceeded => Error::RateLimitExceeded,
            GitHubError::NotFound(what) => Error::NotFound(what),
            GitHubError::RequestFailed(msg) => Error::NetworkError(msg),
            GitHubError::NetworkError(e) => Error::NetworkError(e.to_string()),
            GitHubError::ParseError(e) => Error::NetworkError(format!("Malformed response: {}", e)),
        }
    }
}
