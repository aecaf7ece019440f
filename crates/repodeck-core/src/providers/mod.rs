// Gateway implementations
pub mod github;

pub use github::GitHubGateway;
