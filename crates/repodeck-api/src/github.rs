use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_USER_AGENT: &str = "RepoDeck/0.1.0";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Media type that makes the readme endpoint return rendered HTML
/// instead of the base64 JSON envelope.
const HTML_MEDIA_TYPE: &str = "application/vnd.github.v3.html";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Search query is empty")]
    EmptyQuery,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Thin unauthenticated client over the GitHub REST API.
///
/// Every call is a single request: no retry, no caching. Callers decide
/// what a failure means for their screen.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(GITHUB_API_BASE.to_string())
    }

    /// For GitHub Enterprise or a local stand-in server
    pub fn with_base_url(base_url: String) -> Result<Self> {
        Self::with_options(
            base_url,
            DEFAULT_USER_AGENT,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_options(base_url: String, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        let agent = reqwest::header::HeaderValue::from_str(user_agent)
            .map_err(|e| GitHubError::RequestFailed(format!("Invalid user agent: {}", e)))?;
        headers.insert(reqwest::header::USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search repositories, most starred first.
    ///
    /// A blank query is rejected before any request goes out. Items that
    /// don't match the expected shape are skipped rather than failing the
    /// whole page.
    pub async fn search_repositories(&self, query: &str) -> Result<Vec<GitHubRepo>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GitHubError::EmptyQuery);
        }

        let url = format!("{}/search/repositories", self.base_url);
        debug!(%url, query, "searching repositories");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, JSON_MEDIA_TYPE)
            .query(&[("q", query), ("sort", "stars"), ("order", "desc")])
            .send()
            .await?;

        let response = ensure_success(response, query).await?;
        let page: SearchPage = response.json().await?;

        if page.incomplete_results {
            debug!(query, "search results flagged incomplete by the API");
        }

        Ok(parse_search_items(page.items))
    }

    /// Fetch the README rendered as HTML.
    ///
    /// Repositories without a README answer 404, which maps to an empty
    /// string.
    pub async fn get_readme_html(&self, owner: &str, repo: &str) -> Result<String> {
        let url = self.repo_url(owner, repo, "readme");
        debug!(%url, "fetching readme");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, HTML_MEDIA_TYPE)
            .send()
            .await?;

        match ensure_success(response, &format!("{}/{}", owner, repo)).await {
            Ok(response) => Ok(response.text().await?),
            Err(GitHubError::NotFound(_)) => {
                debug!(owner, repo, "repository has no readme");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the top contributors, highest contribution count first.
    ///
    /// Empty repositories answer 204 and missing ones 404; both become an
    /// empty list.
    pub async fn get_contributors(
        &self,
        owner: &str,
        repo: &str,
        limit: usize,
    ) -> Result<Vec<GitHubContributor>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let url = self.repo_url(owner, repo, "contributors");
        // The API caps per_page at 100
        let per_page = limit.min(100).to_string();
        debug!(%url, %per_page, "fetching contributors");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, JSON_MEDIA_TYPE)
            .query(&[("per_page", per_page.as_str())])
            .send()
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }

        let response = match ensure_success(response, &format!("{}/{}", owner, repo)).await {
            Ok(response) => response,
            Err(GitHubError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let contributors: Vec<GitHubContributor> = serde_json::from_str(&body)?;
        Ok(rank_contributors(contributors, limit))
    }

    fn repo_url(&self, owner: &str, repo: &str, endpoint: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            endpoint
        )
    }
}

/// Map non-success statuses onto GitHubError, passing successful
/// responses through untouched.
async fn ensure_success(response: reqwest::Response, subject: &str) -> Result<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(GitHubError::NotFound(subject.to_string()));
    }

    // Unauthenticated clients hit 403 with a zeroed remaining counter
    let rate_limited = status == StatusCode::TOO_MANY_REQUESTS
        || (status == StatusCode::FORBIDDEN
            && response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                == Some("0"));
    if rate_limited {
        warn!(subject, "GitHub rate limit exceeded");
        return Err(GitHubError::RateLimitExceeded);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GitHubError::RequestFailed(format!(
        "Status {}: {}",
        status, body
    )))
}

fn parse_search_items(items: Vec<serde_json::Value>) -> Vec<GitHubRepo> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<GitHubRepo>(item) {
            Ok(repo) => Some(repo),
            Err(e) => {
                warn!("Skipping malformed search item: {}", e);
                None
            }
        })
        .collect()
}

fn rank_contributors(mut contributors: Vec<GitHubContributor>, limit: usize) -> Vec<GitHubContributor> {
    // Stable sort keeps the API's order among equal counts
    contributors.sort_by(|a, b| b.contributions.cmp(&a.contributions));
    contributors.truncate(limit);
    contributors
}

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    incomplete_results: bool,
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepo {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    pub owner: Option<GitHubOwner>,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub forks_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub open_issues_count: u32,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub license: Option<GitHubLicense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOwner {
    pub login: String,
    pub avatar_url: String,
    pub html_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubLicense {
    pub key: String,
    pub name: String,
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubContributor {
    pub login: String,
    pub avatar_url: String,
    pub contributions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn sample_item(id: u64, name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "full_name": format!("octo/{}", name),
            "owner": { "login": "octo", "avatar_url": "https://avatars.example/octo", "html_url": null },
            "description": null,
            "html_url": format!("https://github.com/octo/{}", name),
            "homepage": "",
            "stargazers_count": 1200,
            "forks_count": 30,
            "watchers_count": 1200,
            "open_issues_count": 4,
            "language": "Rust",
            "topics": ["cli", "tui"],
            "license": { "key": "mit", "name": "MIT License", "spdx_id": "MIT" },
            "created_at": "2020-01-05T10:00:00Z",
            "updated_at": "2024-03-01T08:30:00Z",
            "archived": false,
            "fork": false
        })
    }

    #[test]
    fn test_parse_search_items_keeps_valid_entries() {
        let items = vec![sample_item(1, "alpha"), sample_item(2, "beta")];
        let repos = parse_search_items(items);

        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].full_name, "octo/alpha");
        assert_eq!(repos[0].stargazers_count, 1200);
        assert_eq!(repos[1].license.as_ref().map(|l| l.spdx_id.as_deref()), Some(Some("MIT")));
    }

    #[test]
    fn test_parse_search_items_skips_malformed_entries() {
        let mut broken = sample_item(3, "gamma");
        broken.as_object_mut().unwrap().remove("created_at");

        let repos = parse_search_items(vec![sample_item(1, "alpha"), broken, serde_json::json!("nope")]);

        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].id, 1);
    }

    #[test]
    fn test_parse_handles_null_owner_and_license() {
        let mut item = sample_item(9, "orphan");
        item["owner"] = serde_json::Value::Null;
        item["license"] = serde_json::Value::Null;
        item.as_object_mut().unwrap().remove("topics");

        let repos = parse_search_items(vec![item]);

        assert_eq!(repos.len(), 1);
        assert!(repos[0].owner.is_none());
        assert!(repos[0].license.is_none());
        assert!(repos[0].topics.is_empty());
    }

    #[test]
    fn test_rank_contributors_sorts_and_truncates() {
        let people = vec![
            GitHubContributor { login: "a".into(), avatar_url: String::new(), contributions: 3 },
            GitHubContributor { login: "b".into(), avatar_url: String::new(), contributions: 40 },
            GitHubContributor { login: "c".into(), avatar_url: String::new(), contributions: 12 },
        ];

        let ranked = rank_contributors(people, 2);

        let logins: Vec<_> = ranked.iter().map(|c| c.login.as_str()).collect();
        assert_eq!(logins, vec!["b", "c"]);
    }

    #[test]
    fn test_repo_url_encodes_path_segments() {
        let client = GitHubClient::with_base_url("https://api.example.com/".into()).unwrap();

        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(
            client.repo_url("some owner", "repo#1", "readme"),
            "https://api.example.com/repos/some%20owner/repo%231/readme"
        );
    }

    #[tokio::test]
    async fn test_blank_query_never_hits_the_network() {
        // Nothing listens on the discard port; a real request would fail
        // with NetworkError instead
        let client = GitHubClient::with_base_url("http://127.0.0.1:9".into()).unwrap();

        let result = client.search_repositories("   ").await;

        assert!(matches!(result, Err(GitHubError::EmptyQuery)));
    }

    #[tokio::test]
    async fn test_zero_contributor_limit_short_circuits() {
        let client = GitHubClient::with_base_url("http://127.0.0.1:9".into()).unwrap();

        let result = client.get_contributors("octo", "alpha", 0).await.unwrap();

        assert!(result.is_empty());
    }

    /// Answer exactly one request with `response`; the handle yields the
    /// raw request head the client sent.
    async fn serve_once(response: String) -> (GitHubClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (GitHubClient::with_base_url(base_url).unwrap(), handle)
    }

    fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
        let mut response = format!("HTTP/1.1 {}\r\nconnection: close\r\n", status);
        for (name, value) in headers {
            response.push_str(&format!("{}: {}\r\n", name, value));
        }
        if !status.starts_with("204") {
            response.push_str(&format!("content-length: {}\r\n", body.len()));
        }
        response.push_str("\r\n");
        response.push_str(body);
        response
    }

    #[tokio::test]
    async fn test_search_sends_query_sorted_by_stars() {
        let body = r#"{"total_count":0,"incomplete_results":false,"items":[]}"#;
        let response = http_response("200 OK", &[("content-type", "application/json")], body);
        let (client, server) = serve_once(response).await;

        let repos = client.search_repositories(" a b ").await.unwrap();
        let request = server.await.unwrap();

        assert!(repos.is_empty());
        assert!(
            request.starts_with("GET /search/repositories?q=a+b&sort=stars&order=desc "),
            "unexpected request line: {}",
            request
        );
        assert!(request.to_lowercase().contains("accept: application/vnd.github+json"));
    }

    #[tokio::test]
    async fn test_readme_requests_rendered_html() {
        let response = http_response("200 OK", &[("content-type", "text/html")], "<h1>Hi</h1>");
        let (client, server) = serve_once(response).await;

        let html = client.get_readme_html("octo", "alpha").await.unwrap();
        let request = server.await.unwrap();

        assert_eq!(html, "<h1>Hi</h1>");
        assert!(request.starts_with("GET /repos/octo/alpha/readme "));
        assert!(request.to_lowercase().contains("accept: application/vnd.github.v3.html"));
    }

    #[tokio::test]
    async fn test_missing_readme_is_empty() {
        let response = http_response("404 Not Found", &[], r#"{"message":"Not Found"}"#);
        let (client, server) = serve_once(response).await;

        let html = client.get_readme_html("octo", "alpha").await.unwrap();
        server.await.unwrap();

        assert_eq!(html, "");
    }

    #[tokio::test]
    async fn test_contributors_no_content_is_empty() {
        let (client, server) = serve_once(http_response("204 No Content", &[], "")).await;

        let people = client.get_contributors("octo", "empty", 5).await.unwrap();
        server.await.unwrap();

        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_contributors_not_found_is_empty() {
        let response = http_response("404 Not Found", &[], r#"{"message":"Not Found"}"#);
        let (client, server) = serve_once(response).await;

        let people = client.get_contributors("octo", "gone", 5).await.unwrap();
        server.await.unwrap();

        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_contributors_are_ranked_and_limited() {
        let body = r#"[
            {"login":"a","avatar_url":"","contributions":3},
            {"login":"b","avatar_url":"","contributions":40},
            {"login":"c","avatar_url":"","contributions":12}
        ]"#;
        let response = http_response("200 OK", &[("content-type", "application/json")], body);
        let (client, server) = serve_once(response).await;

        let people = client.get_contributors("octo", "alpha", 2).await.unwrap();
        let request = server.await.unwrap();

        let logins: Vec<_> = people.iter().map(|c| c.login.as_str()).collect();
        assert_eq!(logins, vec!["b", "c"]);
        assert!(request.starts_with("GET /repos/octo/alpha/contributors?per_page=2 "));
    }

    #[tokio::test]
    async fn test_forbidden_with_exhausted_quota_is_rate_limit() {
        let (client, server) = serve_once(http_response(
            "403 Forbidden",
            &[("x-ratelimit-remaining", "0")],
            r#"{"message":"API rate limit exceeded"}"#,
        ))
        .await;

        let result = client.search_repositories("tokio").await;
        server.await.unwrap();

        assert!(matches!(result, Err(GitHubError::RateLimitExceeded)));
    }

    #[tokio::test]
    async fn test_too_many_requests_is_rate_limit() {
        let (client, server) = serve_once(http_response("429 Too Many Requests", &[], "")).await;

        let result = client.get_readme_html("octo", "alpha").await;
        server.await.unwrap();

        assert!(matches!(result, Err(GitHubError::RateLimitExceeded)));
    }

    #[tokio::test]
    async fn test_plain_forbidden_is_request_failure() {
        let (client, server) = serve_once(http_response(
            "403 Forbidden",
            &[("x-ratelimit-remaining", "41")],
            "blocked",
        ))
        .await;

        let result = client.search_repositories("tokio").await;
        server.await.unwrap();

        assert!(matches!(result, Err(GitHubError::RequestFailed(msg)) if msg.contains("403")));
    }
}
