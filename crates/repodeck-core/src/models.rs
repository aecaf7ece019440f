use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Stable GitHub repository id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoId(pub u64);

impl From<u64> for RepoId {
    fn from(id: u64) -> Self {
        RepoId(id)
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Repository as the views see it.
///
/// Equality and hashing go through `id` only: two snapshots of the same
/// repository fetched at different times are the same record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRecord {
    pub id: RepoId,
    pub name: String,
    pub full_name: String,
    pub owner: Option<Owner>,
    pub description: Option<String>,
    pub html_url: String,
    pub homepage: Option<String>,
    pub stars: u32,
    pub forks: u32,
    pub watchers: u32,
    pub open_issues: u32,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub license: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_archived: bool,
}

impl RepositoryRecord {
    /// Owner login, falling back to the `owner/name` prefix when the API
    /// left the owner object out.
    pub fn owner_login(&self) -> Option<&str> {
        match &self.owner {
            Some(owner) => Some(owner.login.as_str()),
            None => self
                .full_name
                .split_once('/')
                .map(|(owner, _)| owner)
                .filter(|owner| !owner.is_empty()),
        }
    }

    /// Text placed on the clipboard by the share action
    pub fn share_message(&self) -> String {
        format!(
            "Check out this GitHub repository: {}\n{}",
            self.name, self.html_url
        )
    }
}

impl PartialEq for RepositoryRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RepositoryRecord {}

impl Hash for RepositoryRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
}

/// One entry of a repository's top-contributor list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    pub avatar_url: String,
    pub contributions: u32,
}
