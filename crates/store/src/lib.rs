//! Category store contract consumed by the path-resolution core.
//!
//! The core treats the store as a read-only collaborator: it fetches category
//! records by id, slug, or filter, and never mutates them. Mutations happen
//! through a concrete store implementation (here, [`MemoryStore`]) and fire
//! invalidation hooks so that any cached path data can be discarded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// Persisted category row as the store hands it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Unique identifier for the category
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// URL-safe identifier, unique across all categories
    pub slug: String,
    /// Parent category id; `None` marks a root
    pub parent_id: Option<String>,
}

/// Filter applied by [`CategoryStore::list_categories`].
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    /// Restrict to direct children of this category.
    pub parent_id: Option<String>,
    /// Restrict to root categories (no parent).
    pub roots_only: bool,
}

impl CategoryFilter {
    /// Filter matching every category.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching direct children of `parent_id`.
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            roots_only: false,
        }
    }

    /// Filter matching root categories only.
    pub fn roots() -> Self {
        Self {
            parent_id: None,
            roots_only: true,
        }
    }

    fn matches(&self, record: &CategoryRecord) -> bool {
        if self.roots_only {
            return record.parent_id.is_none();
        }
        match &self.parent_id {
            Some(parent) => record.parent_id.as_deref() == Some(parent.as_str()),
            None => true,
        }
    }
}

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("slug '{slug}' is already in use")]
    SlugTaken { slug: String },

    #[error("category '{id}' does not exist")]
    MissingCategory { id: String },

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Read-side contract the resolution core depends on.
///
/// Every call is a potential I/O suspension point; ancestor walks issue one
/// `get_category` per level.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Fetch a single category by id. `Ok(None)` means "not found".
    async fn get_category(&self, id: &str) -> Result<Option<CategoryRecord>, StoreError>;

    /// Fetch a single category by its globally unique slug.
    async fn get_category_by_slug(&self, slug: &str)
        -> Result<Option<CategoryRecord>, StoreError>;

    /// List categories matching `filter`, ordered by name.
    async fn list_categories(
        &self,
        filter: CategoryFilter,
    ) -> Result<Vec<CategoryRecord>, StoreError>;
}
