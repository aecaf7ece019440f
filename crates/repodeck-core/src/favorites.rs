use crate::models::{RepoId, RepositoryRecord};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Ordered set of favorited repositories, unique by id.
///
/// Insertion order is kept for display; the id index makes membership
/// checks O(1).
#[derive(Debug, Clone, Default)]
pub struct FavoritesCollection {
    records: Vec<RepositoryRecord>,
    ids: HashSet<RepoId>,
}

impl FavoritesCollection {
    pub fn contains(&self, id: RepoId) -> bool {
        self.ids.contains(&id)
    }

    pub fn get(&self, id: RepoId) -> Option<&RepositoryRecord> {
        if !self.contains(id) {
            return None;
        }
        self.records.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RepositoryRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[RepositoryRecord] {
        &self.records
    }

    pub fn ids(&self) -> Vec<RepoId> {
        self.records.iter().map(|r| r.id).collect()
    }

    fn insert(&mut self, record: RepositoryRecord) -> bool {
        if !self.ids.insert(record.id) {
            return false;
        }
        self.records.push(record);
        true
    }

    fn remove(&mut self, id: RepoId) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.records.retain(|r| r.id != id);
        true
    }
}

impl PartialEq for FavoritesCollection {
    fn eq(&self, other: &Self) -> bool {
        self.ids() == other.ids()
    }
}

impl<'a> IntoIterator for &'a FavoritesCollection {
    type Item = &'a RepositoryRecord;
    type IntoIter = std::slice::Iter<'a, RepositoryRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Immutable snapshot handed out by the store
pub type Favorites = Arc<FavoritesCollection>;

/// Shared favorites state, injected into every view that reads or
/// toggles it.
///
/// Clones are handles to the same collection. Mutations publish the new
/// snapshot before they return, so every observer and every `list()`
/// call sees it immediately. Snapshots already handed out never change.
#[derive(Debug, Clone)]
pub struct FavoritesStore {
    sender: Arc<watch::Sender<Favorites>>,
}

impl FavoritesStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Favorites::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Insert `record` unless a record with the same id is already there.
    pub fn add(&self, record: RepositoryRecord) -> Favorites {
        let id = record.id;
        let name = record.full_name.clone();

        let added = self.sender.send_if_modified(|current| {
            if current.contains(id) {
                return false;
            }
            Arc::make_mut(current).insert(record)
        });

        if added {
            info!(%id, repo = %name, "added to favorites");
        }
        self.list()
    }

    /// Drop the record with `id` if present.
    pub fn remove(&self, id: RepoId) -> Favorites {
        let removed = self.sender.send_if_modified(|current| {
            if !current.contains(id) {
                return false;
            }
            Arc::make_mut(current).remove(id)
        });

        if removed {
            info!(%id, "removed from favorites");
        }
        self.list()
    }

    pub fn contains(&self, id: RepoId) -> bool {
        self.sender.borrow().contains(id)
    }

    pub fn list(&self) -> Favorites {
        self.sender.borrow().clone()
    }

    /// Flip membership of `record`; returns whether it is a favorite
    /// afterwards.
    ///
    /// The check and the flip happen under one write, so concurrent
    /// toggles from different handles never both add.
    pub fn toggle(&self, record: &RepositoryRecord) -> bool {
        let mut now_favorite = false;

        self.sender.send_if_modified(|current| {
            let collection = Arc::make_mut(current);
            now_favorite = !collection.remove(record.id) && collection.insert(record.clone());
            true
        });

        if now_favorite {
            info!(id = %record.id, repo = %record.full_name, "added to favorites");
        } else {
            info!(id = %record.id, "removed from favorites");
        }
        now_favorite
    }

    pub fn subscribe(&self) -> FavoritesObserver {
        FavoritesObserver {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for FavoritesStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read side for views that want to know when to redraw
#[derive(Debug, Clone)]
pub struct FavoritesObserver {
    receiver: watch::Receiver<Favorites>,
}

impl FavoritesObserver {
    /// Latest snapshot, seen or not
    pub fn current(&self) -> Favorites {
        self.receiver.borrow().clone()
    }

    /// True when a mutation happened since the last `mark_seen`
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    pub fn mark_seen(&mut self) -> Favorites {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for the next mutation. `None` once every store handle is gone.
    pub async fn changed(&mut self) -> Option<Favorites> {
        self.receiver.changed().await.ok()?;
        Some(self.mark_seen())
    }
}
