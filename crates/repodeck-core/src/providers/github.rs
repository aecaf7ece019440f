// GitHub gateway - bridges the API client with the RepositoryGateway trait
use async_trait::async_trait;
use repodeck_api::{GitHubClient, GitHubContributor, GitHubRepo};
use std::time::Duration;
use tracing::warn;

use crate::{
    config::GitHubConfig,
    gateway::RepositoryGateway,
    models::{Contributor, Owner, RepoId, RepositoryRecord},
    Error, Result,
};

/// Wrapper around GitHubClient that validates payloads on the way in
pub struct GitHubGateway {
    client: GitHubClient,
}

impl GitHubGateway {
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &GitHubConfig) -> Result<Self> {
        let client = GitHubClient::with_options(
            config.api_url.clone(),
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl RepositoryGateway for GitHubGateway {
    async fn search_repositories(&self, query: &str) -> Result<Vec<RepositoryRecord>> {
        let repos = self.client.search_repositories(query).await?;
        Ok(into_records(repos))
    }

    async fn fetch_documentation(&self, owner: &str, repo: &str) -> Result<String> {
        Ok(self.client.get_readme_html(owner, repo).await?)
    }

    async fn fetch_contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<Contributor>> {
        let contributors = self.client.get_contributors(owner, repo, limit).await?;
        Ok(contributors.into_iter().map(contributor_from_github).collect())
    }
}

/// Convert a page of API repos, dropping the ones that fail validation
fn into_records(repos: Vec<GitHubRepo>) -> Vec<RepositoryRecord> {
    repos
        .into_iter()
        .filter_map(|gh| match RepositoryRecord::try_from(gh) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Dropping search result: {}", e);
                None
            }
        })
        .collect()
}

impl TryFrom<GitHubRepo> for RepositoryRecord {
    type Error = Error;

    fn try_from(gh: GitHubRepo) -> Result<Self> {
        if gh.name.trim().is_empty() {
            return Err(Error::InvalidRecord(format!("repository {} has no name", gh.id)));
        }
        if !gh.full_name.contains('/') {
            return Err(Error::InvalidRecord(format!(
                "repository {} has malformed full name {:?}",
                gh.id, gh.full_name
            )));
        }
        if gh.html_url.trim().is_empty() {
            return Err(Error::InvalidRecord(format!("repository {} has no URL", gh.id)));
        }

        Ok(RepositoryRecord {
            id: RepoId(gh.id),
            name: gh.name,
            full_name: gh.full_name,
            owner: gh.owner.map(|o| Owner {
                login: o.login,
                avatar_url: o.avatar_url,
            }),
            description: non_blank(gh.description),
            html_url: gh.html_url,
            // The API sends "" for repos without a homepage
            homepage: non_blank(gh.homepage),
            stars: gh.stargazers_count,
            forks: gh.forks_count,
            watchers: gh.watchers_count,
            open_issues: gh.open_issues_count,
            language: non_blank(gh.language),
            topics: gh.topics,
            license: gh.license.map(|l| l.name),
            created_at: gh.created_at,
            updated_at: gh.updated_at,
            is_archived: gh.archived,
        })
    }
}

fn contributor_from_github(gh: GitHubContributor) -> Contributor {
    Contributor {
        login: gh.login,
        avatar_url: gh.avatar_url,
        contributions: gh.contributions,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use repodeck_api::{GitHubLicense, GitHubOwner};

    fn github_repo(id: u64, name: &str) -> GitHubRepo {
        GitHubRepo {
            id,
            name: name.to_string(),
            full_name: format!("octo/{}", name),
            owner: Some(GitHubOwner {
                login: "octo".to_string(),
                avatar_url: "https://avatars.example/octo".to_string(),
                html_url: None,
            }),
            description: Some("Fast things".to_string()),
            html_url: format!("https://github.com/octo/{}", name),
            homepage: Some(String::new()),
            stargazers_count: 2048,
            forks_count: 64,
            watchers_count: 2048,
            open_issues_count: 8,
            language: Some("Rust".to_string()),
            topics: vec!["async".to_string()],
            license: Some(GitHubLicense {
                key: "apache-2.0".to_string(),
                name: "Apache License 2.0".to_string(),
                spdx_id: Some("Apache-2.0".to_string()),
            }),
            created_at: Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            archived: false,
            fork: false,
        }
    }

    #[test]
    fn test_conversion_maps_fields() {
        let record = RepositoryRecord::try_from(github_repo(10, "engine")).unwrap();

        assert_eq!(record.id, RepoId(10));
        assert_eq!(record.full_name, "octo/engine");
        assert_eq!(record.owner_login(), Some("octo"));
        assert_eq!(record.stars, 2048);
        assert_eq!(record.license.as_deref(), Some("Apache License 2.0"));
        assert_eq!(record.homepage, None);
    }

    #[test]
    fn test_conversion_rejects_malformed_full_name() {
        let mut gh = github_repo(11, "broken");
        gh.full_name = "broken".to_string();

        let err = RepositoryRecord::try_from(gh).unwrap_err();
        assert!(matches!(err, Error::InvalidRecord(_)));
    }

    #[test]
    fn test_into_records_drops_invalid_entries() {
        let mut nameless = github_repo(2, "x");
        nameless.name = "  ".to_string();

        let records = into_records(vec![github_repo(1, "a"), nameless, github_repo(3, "c")]);

        let ids: Vec<_> = records.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_blank_search_maps_to_empty_query() {
        let client = GitHubClient::with_base_url("http://127.0.0.1:9".into()).unwrap();
        let gateway = GitHubGateway::new(client);

        let result = gateway.search_repositories("").await;

        assert!(matches!(result, Err(Error::EmptyQuery)));
    }
}
