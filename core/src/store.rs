//! Local store for fetched repositories and favorites.
//!
//! # Design
//! The traits are the persistence boundary use cases write through; the
//! bundled `InMemoryStore` backs both with `RwLock`ed maps. Writes triggered
//! by a successful fetch go through `spawn_upsert` and are not awaited, so a
//! read right after a fetch may not see its items yet.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::fuzzy::matches_fuzzy_search;
use crate::github::types::{GitCollaborator, GitRepository};

pub trait RepositoryStore: Send + Sync {
    /// Insert new repositories and replace known ones, matched by id.
    fn upsert_repositories(&self, repos: Vec<GitRepository>);

    /// Most-starred first.
    fn all_repositories(&self) -> Vec<GitRepository>;

    /// Repositories whose full name fuzzily matches `term`.
    fn repositories_filtered(&self, term: &str) -> Vec<GitRepository> {
        self.all_repositories()
            .into_iter()
            .filter(|repo| matches_fuzzy_search(&repo.repo_name, term))
            .collect()
    }

    fn is_favorite(&self, repo_id: u64) -> bool;

    /// Returns whether the favorite set changed. Unknown repositories cannot
    /// be favorited.
    fn set_favorite(&self, repo_id: u64, favorite: bool) -> bool;

    /// Flip the favorite flag; returns the new state.
    fn toggle_favorite(&self, repo_id: u64) -> bool;

    fn favorites(&self) -> Vec<GitRepository>;
}

pub trait CollaboratorStore: Send + Sync {
    fn add_favorite_collaborators(&self, collaborators: Vec<GitCollaborator>);

    fn is_favorite_collaborator(&self, login: &str) -> bool;

    /// Flip the favorite flag; returns the new state.
    fn toggle_favorite_collaborator(&self, collaborator: &GitCollaborator) -> bool;

    fn favorite_collaborators(&self) -> Vec<GitCollaborator>;
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    repositories: RwLock<BTreeMap<u64, GitRepository>>,
    favorites: RwLock<BTreeMap<u64, DateTime<Utc>>>,
    collaborators: RwLock<BTreeMap<String, GitCollaborator>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `repo_id` was favorited, if it is.
    pub fn favorited_at(&self, repo_id: u64) -> Option<DateTime<Utc>> {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&repo_id)
            .copied()
    }
}

fn by_stars(mut repos: Vec<GitRepository>) -> Vec<GitRepository> {
    repos.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count).then(a.id.cmp(&b.id)));
    repos
}

impl RepositoryStore for InMemoryStore {
    fn upsert_repositories(&self, repos: Vec<GitRepository>) {
        let mut stored = self.repositories.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = 0usize;
        let mut inserted = 0usize;
        for repo in repos {
            match stored.insert(repo.id, repo) {
                Some(_) => updated += 1,
                None => inserted += 1,
            }
        }
        debug!(inserted, updated, "upserted repositories");
    }

    fn all_repositories(&self) -> Vec<GitRepository> {
        let stored = self.repositories.read().unwrap_or_else(PoisonError::into_inner);
        by_stars(stored.values().cloned().collect())
    }

    fn is_favorite(&self, repo_id: u64) -> bool {
        self.favorites
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&repo_id)
    }

    fn set_favorite(&self, repo_id: u64, favorite: bool) -> bool {
        let known = self
            .repositories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&repo_id);
        let mut favorites = self.favorites.write().unwrap_or_else(PoisonError::into_inner);
        match (favorite, favorites.contains_key(&repo_id)) {
            (true, false) if known => {
                favorites.insert(repo_id, Utc::now());
                true
            }
            (false, true) => {
                favorites.remove(&repo_id);
                true
            }
            _ => false,
        }
    }

    fn toggle_favorite(&self, repo_id: u64) -> bool {
        let current = self.is_favorite(repo_id);
        self.set_favorite(repo_id, !current);
        self.is_favorite(repo_id)
    }

    fn favorites(&self) -> Vec<GitRepository> {
        let favorites = self.favorites.read().unwrap_or_else(PoisonError::into_inner);
        let stored = self.repositories.read().unwrap_or_else(PoisonError::into_inner);
        by_stars(
            favorites
                .keys()
                .filter_map(|id| stored.get(id).cloned())
                .collect(),
        )
    }
}

impl CollaboratorStore for InMemoryStore {
    fn add_favorite_collaborators(&self, collaborators: Vec<GitCollaborator>) {
        let mut stored = self.collaborators.write().unwrap_or_else(PoisonError::into_inner);
        for collaborator in collaborators {
            stored.insert(collaborator.login.clone(), collaborator);
        }
    }

    fn is_favorite_collaborator(&self, login: &str) -> bool {
        self.collaborators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(login)
    }

    fn toggle_favorite_collaborator(&self, collaborator: &GitCollaborator) -> bool {
        let mut stored = self.collaborators.write().unwrap_or_else(PoisonError::into_inner);
        if stored.remove(&collaborator.login).is_some() {
            false
        } else {
            stored.insert(collaborator.login.clone(), collaborator.clone());
            true
        }
    }

    fn favorite_collaborators(&self) -> Vec<GitCollaborator> {
        self.collaborators
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }
}

/// Upsert `repos` on a background thread without waiting for it.
///
/// The handle is returned for callers (and tests) that do want to wait.
pub fn spawn_upsert(
    store: Arc<dyn RepositoryStore>,
    repos: Vec<GitRepository>,
) -> Option<thread::JoinHandle<()>> {
    let count = repos.len();
    let spawned = thread::Builder::new()
        .name("hubview-store".to_string())
        .spawn(move || store.upsert_repositories(repos));
    match spawned {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!(error = %e, count, "could not start background store write; items dropped");
            None
        }
    }
}
