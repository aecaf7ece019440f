// API client for the GitHub REST endpoints RepoDeck talks to
pub mod github;

// Re-export common types
pub use github::{
    GitHubClient, GitHubContributor, GitHubError, GitHubLicense, GitHubOwner, GitHubRepo,
};
