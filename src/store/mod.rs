//! The reader's state container.
//!
//! State is split in two slices. [`SessionState`] lives and dies with the
//! process. [`PersistentState`] holds the favorites and is written to its
//! [`FavoritesStorage`] after every change to it. All operations are
//! synchronous and total: a failed save is logged, never returned.

use serde::{Deserialize, Serialize};

use crate::types::{Article, Category};

pub mod storage;


pub use storage::{FavoritesStorage, JsonFileStorage, MemoryStorage, StorageError, STORAGE_NAME};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub articles: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_category: Category,
    pub search_query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentState {
    #[serde(default)]
    pub favorites: Vec<Article>,
}

/// Everything a consumer can observe, in wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsStoreState {
    pub articles: Vec<Article>,
    pub favorites: Vec<Article>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub selected_category: Category,
    pub search_query: String,
}

pub struct NewsStore {
    session: SessionState,
    persistent: PersistentState,
    storage: Box<dyn FavoritesStorage>,
}

impl NewsStore {
    /// Builds a store, restoring favorites from `storage`. Session fields
    /// always start from their defaults.
    pub fn open(storage: impl FavoritesStorage + 'static) -> Self {
        let persistent = match storage.load() {
            Ok(Some(state)) => {
                tracing::debug!(favorites = state.favorites.len(), "restored favorites");
                state
            }
            Ok(None) => PersistentState::default(),
            Err(e) => {
                tracing::warn!(error = %e, "could not restore favorites, starting empty");
                PersistentState::default()
            }
        };

        Self {
            session: SessionState::default(),
            persistent,
            storage: Box::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryStorage::new())
    }

    pub fn state(&self) -> NewsStoreState {
        NewsStoreState {
            articles: self.session.articles.clone(),
            favorites: self.persistent.favorites.clone(),
            is_loading: self.session.is_loading,
            error: self.session.error.clone(),
            selected_category: self.session.selected_category,
            search_query: self.session.search_query.clone(),
        }
    }

    pub fn articles(&self) -> &[Article] {
        &self.session.articles
    }

    pub fn favorites(&self) -> &[Article] {
        &self.persistent.favorites
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.session.error.as_deref()
    }

    pub fn selected_category(&self) -> Category {
        self.session.selected_category
    }

    pub fn search_query(&self) -> &str {
        &self.session.search_query
    }

    /// Search mode wins over category mode whenever a query is set.
    pub fn is_search_mode(&self) -> bool {
        !self.session.search_query.is_empty()
    }

    pub fn is_favorite(&self, url: &str) -> bool {
        self.persistent.favorites.iter().any(|a| a.url == url)
    }

    pub fn set_articles(&mut self, articles: Vec<Article>) {
        self.session.articles = articles;
    }

    /// Appends without checking for an existing entry with the same url.
    /// Use [`NewsStore::toggle_favorite`] when duplicates must be avoided.
    pub fn add_favorite(&mut self, article: Article) {
        self.persistent.favorites.push(article);
        self.persist();
    }

    pub fn remove_favorite(&mut self, url: &str) {
        let before = self.persistent.favorites.len();
        self.persistent.favorites.retain(|a| a.url != url);

        if self.persistent.favorites.len() != before {
            self.persist();
        }
    }

    /// Returns whether the article is a favorite afterwards.
    pub fn toggle_favorite(&mut self, article: Article) -> bool {
        if self.is_favorite(&article.url) {
            self.remove_favorite(&article.url);
            false
        } else {
            self.add_favorite(article);
            true
        }
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.session.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.session.error = error;
    }

    /// Switches to category mode, dropping any active search.
    pub fn set_selected_category(&mut self, category: Category) {
        self.session.selected_category = category;
        self.session.search_query.clear();
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.session.search_query = query.into();
    }

    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.persistent) {
            tracing::error!(error = %e, "failed to persist favorites");
        }
    }
}

impl std::fmt::Debug for NewsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsStore")
            .field("session", &self.session)
            .field("persistent", &self.persistent)
            .finish_non_exhaustive()
    }
}
