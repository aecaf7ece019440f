use super::{RequestToken, RequestTracker};
use crate::{
    favorites::FavoritesStore,
    gateway::RepositoryGateway,
    models::{RepoId, RepositoryRecord},
    Error, Result,
};
use tracing::{debug, info, warn};

/// Shown inline when a search fails; details go to the log
pub const SEARCH_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// A search the caller should run against the gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: RequestToken,
    pub query: String,
}

/// Search screen state
pub struct SearchView {
    favorites: FavoritesStore,
    last_query: Option<String>,
    results: Vec<RepositoryRecord>,
    selected: usize,
    loading: bool,
    error: Option<String>,
    requests: RequestTracker,
}

impl SearchView {
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            favorites,
            last_query: None,
            results: Vec::new(),
            selected: 0,
            loading: false,
            error: None,
            requests: RequestTracker::default(),
        }
    }

    /// Start a search for `query`.
    ///
    /// A blank query clears the screen and returns `None`: there is
    /// nothing to send, and any search still in flight becomes stale.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchRequest> {
        let query = query.trim();

        if query.is_empty() {
            self.requests.invalidate();
            self.last_query = None;
            self.results.clear();
            self.selected = 0;
            self.loading = false;
            self.error = None;
            return None;
        }

        info!(query, "searching repositories");
        self.loading = true;
        self.error = None;
        self.last_query = Some(query.to_string());

        Some(SearchRequest {
            token: self.requests.issue(),
            query: query.to_string(),
        })
    }

    /// Re-run the last submitted query
    pub fn refresh(&mut self) -> Option<SearchRequest> {
        let query = self.last_query.clone()?;
        self.begin_search(&query)
    }

    /// Apply a gateway response. Returns false when the response belongs
    /// to a superseded request and was dropped.
    pub fn complete_search(
        &mut self,
        token: RequestToken,
        result: Result<Vec<RepositoryRecord>>,
    ) -> bool {
        if !self.requests.is_current(token) {
            debug!("discarding stale search response");
            return false;
        }

        self.loading = false;
        match result {
            Ok(results) => {
                debug!(count = results.len(), "search completed");
                self.results = results;
                self.selected = 0;
            }
            Err(Error::EmptyQuery) => {
                self.results.clear();
                self.selected = 0;
            }
            Err(e) => {
                warn!("Search failed: {}", e);
                self.error = Some(SEARCH_ERROR_MESSAGE.to_string());
            }
        }
        true
    }

    /// Begin and complete a search in one go
    pub async fn search(&mut self, gateway: &dyn RepositoryGateway, query: &str) {
        if let Some(request) = self.begin_search(query) {
            let result = gateway.search_repositories(&request.query).await;
            self.complete_search(request.token, result);
        }
    }

    pub fn results(&self) -> &[RepositoryRecord] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<&RepositoryRecord> {
        self.results.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.results.is_empty() {
            self.selected = (self.selected + 1).min(self.results.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn is_favorite(&self, id: RepoId) -> bool {
        self.favorites.contains(id)
    }

    /// Toggle the highlighted result in the favorites store
    pub fn toggle_selected_favorite(&self) -> Option<bool> {
        self.selected().map(|record| self.favorites.toggle(record))
    }
}
