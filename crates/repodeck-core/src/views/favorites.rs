use crate::{
    favorites::{FavoritesObserver, FavoritesStore},
    models::{RepoId, RepositoryRecord},
};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Favorites screen state.
///
/// Rows are read from the store on every call, so a toggle on the
/// details screen shows up here without any refresh step.
pub struct FavoritesView {
    favorites: FavoritesStore,
    observer: FavoritesObserver,
    selected: usize,
    filter: String,
    matcher: SkimMatcherV2,
}

impl FavoritesView {
    pub fn new(favorites: FavoritesStore) -> Self {
        let mut observer = favorites.subscribe();
        observer.mark_seen();

        Self {
            favorites,
            observer,
            selected: 0,
            filter: String::new(),
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Favorites in insertion order, narrowed by the filter text
    pub fn visible(&self) -> Vec<RepositoryRecord> {
        let snapshot = self.favorites.list();
        let filter = self.filter.trim();

        snapshot
            .iter()
            .filter(|repo| filter.is_empty() || self.matches(repo, filter))
            .cloned()
            .collect()
    }

    fn matches(&self, repo: &RepositoryRecord, filter: &str) -> bool {
        self.matcher.fuzzy_match(&repo.full_name, filter).is_some()
            || repo
                .description
                .as_deref()
                .is_some_and(|d| self.matcher.fuzzy_match(d, filter).is_some())
    }

    /// Pick up store mutations made elsewhere. Returns true when the
    /// collection changed since the last call.
    pub fn sync(&mut self) -> bool {
        if !self.observer.has_changed() {
            return false;
        }
        self.observer.mark_seen();
        self.clamp_selection();
        true
    }

    pub fn total(&self) -> usize {
        self.favorites.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.list().is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> Option<RepositoryRecord> {
        self.visible().into_iter().nth(self.selected)
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Remove the highlighted repository from the store
    pub fn remove_selected(&mut self) -> Option<RepoId> {
        let id = self.selected()?.id;
        self.favorites.remove(id);
        self.sync();
        Some(id)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    fn ids(view: &FavoritesView) -> Vec<u64> {
        view.visible().iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn test_reflects_store_without_refresh() {
        let store = FavoritesStore::new();
        let view = FavoritesView::new(store.clone());
        assert!(view.is_empty());

        store.add(record(1));
        store.add(record(2));

        assert_eq!(ids(&view), vec![1, 2]);
        assert_eq!(view.total(), 2);
    }

    #[test]
    fn test_remove_selected() {
        let store = FavoritesStore::new();
        store.add(record(1));
        store.add(record(2));
        let mut view = FavoritesView::new(store.clone());

        view.select_next();
        assert_eq!(view.remove_selected(), Some(RepoId(2)));

        assert_eq!(ids(&view), vec![1]);
        assert!(!store.contains(RepoId(2)));
        assert_eq!(view.selected_index(), 0);
    }

    #[test]
    fn test_remove_on_empty_is_none() {
        let mut view = FavoritesView::new(FavoritesStore::new());
        assert_eq!(view.remove_selected(), None);
    }

    #[test]
    fn test_sync_clamps_after_external_removal() {
        let store = FavoritesStore::new();
        for id in 1..=3 {
            store.add(record(id));
        }
        let mut view = FavoritesView::new(store.clone());
        view.select_next();
        view.select_next();
        assert_eq!(view.selected_index(), 2);

        store.remove(RepoId(3));

        assert!(view.sync());
        assert_eq!(view.selected_index(), 1);
        assert!(!view.sync());
    }

    #[test]
    fn test_filter_keeps_insertion_order() {
        let store = FavoritesStore::new();
        let mut tokio_repo = record(1);
        tokio_repo.full_name = "tokio-rs/tokio".to_string();
        let mut serde_repo = record(2);
        serde_repo.full_name = "serde-rs/serde".to_string();
        serde_repo.description = None;
        let mut mio_repo = record(3);
        mio_repo.full_name = "tokio-rs/mio".to_string();
        store.add(tokio_repo);
        store.add(serde_repo);
        store.add(mio_repo);
        let mut view = FavoritesView::new(store);

        for c in "tokio".chars() {
            view.push_filter_char(c);
        }
        assert_eq!(ids(&view), vec![1, 3]);

        view.clear_filter();
        assert_eq!(ids(&view), vec![1, 2, 3]);
    }
}
