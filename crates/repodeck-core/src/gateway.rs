use crate::{
    models::{Contributor, RepositoryRecord},
    Result,
};

/// Remote source of repositories, readmes and contributors.
///
/// Views only ever talk to this trait, which keeps them testable against
/// a mock and independent of the HTTP client.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Repositories matching `query`, most starred first. Blank queries
    /// fail with `Error::EmptyQuery` without touching the network.
    async fn search_repositories(&self, query: &str) -> Result<Vec<RepositoryRecord>>;

    /// Rendered README HTML, or an empty string when there is none.
    async fn fetch_documentation(&self, owner: &str, repo: &str) -> Result<String>;

    /// Top `limit` contributors by contribution count.
    async fn fetch_contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Contributor>>;
}
