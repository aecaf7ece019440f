use super::{RequestToken, RequestTracker, Section};
use crate::{
    favorites::FavoritesStore,
    gateway::RepositoryGateway,
    models::{Contributor, RepositoryRecord},
    readme::{html_to_lines, lines_to_text, ReadmeLine},
    Result,
};
use tracing::{debug, warn};

/// README as fetched plus its terminal rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    pub html: String,
    pub text: String,
    pub lines: Vec<ReadmeLine>,
}

/// Readme and contributor fetches for one details screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequests {
    pub owner: String,
    pub repo: String,
    pub limit: usize,
    pub readme: RequestToken,
    pub contributors: RequestToken,
}

/// Details screen for a single repository
pub struct DetailView {
    record: RepositoryRecord,
    favorites: FavoritesStore,
    contributors_limit: usize,
    readme: Section<Readme>,
    contributors: Section<Vec<Contributor>>,
    description_expanded: bool,
    readme_requests: RequestTracker,
    contributor_requests: RequestTracker,
}

impl DetailView {
    pub fn new(record: RepositoryRecord, favorites: FavoritesStore, contributors_limit: usize) -> Self {
        Self {
            record,
            favorites,
            contributors_limit,
            readme: Section::Idle,
            contributors: Section::Idle,
            description_expanded: false,
            readme_requests: RequestTracker::default(),
            contributor_requests: RequestTracker::default(),
        }
    }

    /// Mark both sections loading and hand back what to fetch.
    ///
    /// Without an owner login there is no URL to build, so both sections
    /// go straight to unavailable.
    pub fn begin_load(&mut self) -> Option<DetailRequests> {
        let Some(owner) = self.record.owner_login().map(str::to_string) else {
            warn!(repo = %self.record.full_name, "no owner login, skipping detail fetch");
            self.readme_requests.invalidate();
            self.contributor_requests.invalidate();
            self.readme = Section::Unavailable;
            self.contributors = Section::Unavailable;
            return None;
        };

        self.readme = Section::Loading;
        self.contributors = Section::Loading;

        Some(DetailRequests {
            owner,
            repo: self.record.name.clone(),
            limit: self.contributors_limit,
            readme: self.readme_requests.issue(),
            contributors: self.contributor_requests.issue(),
        })
    }

    pub fn complete_readme(&mut self, token: RequestToken, result: Result<String>) -> bool {
        if !self.readme_requests.is_current(token) {
            debug!("discarding stale readme response");
            return false;
        }

        self.readme = match result {
            Ok(html) => {
                let lines = html_to_lines(&html);
                if lines.is_empty() {
                    Section::Unavailable
                } else {
                    let text = lines_to_text(&lines);
                    Section::Ready(Readme { html, text, lines })
                }
            }
            Err(e) => {
                warn!(repo = %self.record.full_name, "Failed to fetch readme: {}", e);
                Section::Failed(e.to_string())
            }
        };
        true
    }

    pub fn complete_contributors(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Contributor>>,
    ) -> bool {
        if !self.contributor_requests.is_current(token) {
            debug!("discarding stale contributors response");
            return false;
        }

        self.contributors = match result {
            Ok(list) if list.is_empty() => Section::Unavailable,
            Ok(mut list) => {
                list.truncate(self.contributors_limit);
                Section::Ready(list)
            }
            Err(e) => {
                warn!(repo = %self.record.full_name, "Failed to fetch contributors: {}", e);
                Section::Failed(e.to_string())
            }
        };
        true
    }

    /// Fetch readme and contributors concurrently and apply both
    pub async fn load(&mut self, gateway: &dyn RepositoryGateway) {
        let Some(requests) = self.begin_load() else {
            return;
        };

        let (readme, contributors) = futures::join!(
            gateway.fetch_documentation(&requests.owner, &requests.repo),
            gateway.fetch_contributors(&requests.owner, &requests.repo, requests.limit),
        );

        self.complete_readme(requests.readme, readme);
        self.complete_contributors(requests.contributors, contributors);
    }

    pub fn record(&self) -> &RepositoryRecord {
        &self.record
    }

    pub fn readme(&self) -> &Section<Readme> {
        &self.readme
    }

    pub fn contributors(&self) -> &Section<Vec<Contributor>> {
        &self.contributors
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.contains(self.record.id)
    }

    /// Returns whether the repository is a favorite afterwards
    pub fn toggle_favorite(&self) -> bool {
        self.favorites.toggle(&self.record)
    }

    pub fn description_expanded(&self) -> bool {
        self.description_expanded
    }

    pub fn toggle_description(&mut self) {
        self.description_expanded = !self.description_expanded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockRepositoryGateway;
    use crate::models::fixtures::record;
    use crate::Error;

    fn contributor(login: &str, contributions: u32) -> Contributor {
        Contributor {
            login: login.to_string(),
            avatar_url: format!("https://avatars.example/{}", login),
            contributions,
        }
    }

    #[tokio::test]
    async fn test_load_fills_both_sections() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_fetch_documentation()
            .withf(|owner: &str, repo: &str| owner == "octo" && repo == "repo-1")
            .times(1)
            .returning(|_, _| Ok("<h1>Hello</h1><p>World</p>".to_string()));
        gateway
            .expect_fetch_contributors()
            .withf(|_: &str, _: &str, limit: &usize| *limit == 5)
            .times(1)
            .returning(|_, _, _| Ok(vec![contributor("alice", 90), contributor("bob", 10)]));
        let mut view = DetailView::new(record(1), FavoritesStore::new(), 5);

        view.load(&gateway).await;

        let readme = view.readme().ready().expect("readme loaded");
        assert_eq!(readme.text, "# Hello\n\nWorld");
        assert_eq!(
            readme.lines[0],
            ReadmeLine::Heading {
                level: 1,
                text: "Hello".to_string()
            }
        );
        let people = view.contributors().ready().expect("contributors loaded");
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].login, "alice");
    }

    #[tokio::test]
    async fn test_missing_content_is_unavailable_not_error() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_fetch_documentation()
            .returning(|_, _| Ok(String::new()));
        gateway
            .expect_fetch_contributors()
            .returning(|_, _, _| Ok(Vec::new()));
        let mut view = DetailView::new(record(2), FavoritesStore::new(), 5);

        view.load(&gateway).await;

        assert_eq!(view.readme(), &Section::Unavailable);
        assert_eq!(view.contributors(), &Section::Unavailable);
    }

    #[tokio::test]
    async fn test_network_errors_surface_inline() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_fetch_documentation()
            .returning(|_, _| Err(Error::NetworkError("dns failure".into())));
        gateway
            .expect_fetch_contributors()
            .returning(|_, _, _| Err(Error::RateLimitExceeded));
        let mut view = DetailView::new(record(3), FavoritesStore::new(), 5);

        view.load(&gateway).await;

        assert!(matches!(view.readme(), Section::Failed(msg) if msg.contains("dns failure")));
        assert!(matches!(view.contributors(), Section::Failed(_)));
    }

    #[tokio::test]
    async fn test_no_owner_skips_gateway() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_fetch_documentation().times(0);
        gateway.expect_fetch_contributors().times(0);
        let mut repo = record(4);
        repo.owner = None;
        repo.full_name = "orphan".to_string();
        let mut view = DetailView::new(repo, FavoritesStore::new(), 5);

        view.load(&gateway).await;

        assert_eq!(view.readme(), &Section::Unavailable);
    }

    #[test]
    fn test_contributors_truncated_to_limit() {
        let mut view = DetailView::new(record(5), FavoritesStore::new(), 2);
        let requests = view.begin_load().unwrap();

        view.complete_contributors(
            requests.contributors,
            Ok(vec![contributor("a", 3), contributor("b", 2), contributor("c", 1)]),
        );

        assert_eq!(view.contributors().ready().map(Vec::len), Some(2));
    }

    #[test]
    fn test_reload_discards_stale_responses() {
        let mut view = DetailView::new(record(6), FavoritesStore::new(), 5);
        let first = view.begin_load().unwrap();
        let second = view.begin_load().unwrap();

        assert!(view.complete_readme(second.readme, Ok("<p>fresh</p>".into())));
        assert!(!view.complete_readme(first.readme, Ok("<p>stale</p>".into())));
        assert!(!view.complete_contributors(first.contributors, Ok(vec![contributor("x", 1)])));

        assert_eq!(view.readme().ready().map(|r| r.text.as_str()), Some("fresh"));
        assert!(view.contributors().is_loading());
    }

    #[test]
    fn test_toggle_is_visible_to_other_handles() {
        let store = FavoritesStore::new();
        let view = DetailView::new(record(7), store.clone(), 5);

        assert!(!view.is_favorite());
        assert!(view.toggle_favorite());
        assert!(store.contains(record(7).id));
        assert!(view.is_favorite());

        store.remove(record(7).id);
        assert!(!view.is_favorite());
    }

    #[test]
    fn test_description_toggle() {
        let mut view = DetailView::new(record(8), FavoritesStore::new(), 5);
        assert!(!view.description_expanded());
        view.toggle_description();
        assert!(view.description_expanded());
    }
}
