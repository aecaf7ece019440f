// Screen state for search, details and favorites
//
// Views own only transient request state. Favorites always come from the
// injected FavoritesStore.
pub mod detail;
pub mod favorites;
pub mod search;

pub use detail::{DetailRequests, DetailView, Readme};
pub use favorites::FavoritesView;
pub use search::{SearchRequest, SearchView, SEARCH_ERROR_MESSAGE};

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one in-flight gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Hands out tokens and remembers the newest one.
///
/// A completion is applied only if it carries the newest token, so a slow
/// response can never overwrite the result of a later request. Tokens are
/// unique across the process: a response addressed to a screen that has
/// since been replaced never matches the replacement's tracker.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: Option<u64>,
}

impl RequestTracker {
    pub fn issue(&mut self) -> RequestToken {
        let token = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
        self.latest = Some(token);
        RequestToken(token)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.latest == Some(token.0)
    }

    /// Make every outstanding token stale
    pub fn invalidate(&mut self) {
        self.latest = None;
    }
}

/// Loadable part of a screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section<T> {
    Idle,
    Loading,
    Ready(T),
    /// Upstream has nothing to show; not an error
    Unavailable,
    Failed(String),
}

impl<T> Section<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Section::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(value) => Some(value),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_latest_token_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();

        assert!(!tracker.is_current(first));
        assert!(tracker.is_current(second));
    }

    #[test]
    fn test_invalidate_stales_everything() {
        let mut tracker = RequestTracker::default();
        let token = tracker.issue();

        tracker.invalidate();

        assert!(!tracker.is_current(token));
    }

    #[test]
    fn test_tokens_are_unique_across_trackers() {
        let mut old_screen = RequestTracker::default();
        let mut new_screen = RequestTracker::default();

        let stale = old_screen.issue();
        let fresh = new_screen.issue();

        assert_ne!(stale, fresh);
        assert!(!new_screen.is_current(stale));
        assert!(new_screen.is_current(fresh));
    }
}
