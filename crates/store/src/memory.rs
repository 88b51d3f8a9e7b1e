//! In-memory category store used for local runs and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{CategoryFilter, CategoryRecord, CategoryStore, StoreError};

/// Callback fired with the touched category id after every mutation.
pub type InvalidationHook = Box<dyn Fn(&str) + Send + Sync>;

/// Input for [`MemoryStore::create`].
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    /// Explicit id; generated (UUIDv7) when absent.
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<String>,
}

/// Partial update for [`MemoryStore::update`].
///
/// `parent_id` is doubly optional: `None` leaves the parent untouched,
/// `Some(None)` promotes the category to a root (reparenting is just an
/// update with a different parent).
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub parent_id: Option<Option<String>>,
}

/// Hash-map backed [`CategoryStore`] with mutation-driven invalidation hooks.
///
/// Slug uniqueness is enforced globally, matching the unique index declared
/// by the categories module migration.
pub struct MemoryStore {
    records: RwLock<HashMap<String, CategoryRecord>>,
    hooks: RwLock<Vec<InvalidationHook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            hooks: RwLock::new(Vec::new()),
        }
    }

    /// Build a store pre-populated with `records`, skipping uniqueness checks.
    /// Intended for tests and fixtures.
    pub fn with_records(records: impl IntoIterator<Item = CategoryRecord>) -> Self {
        let store = Self::new();
        {
            let mut map = store.records.write();
            for record in records {
                map.insert(record.id.clone(), record);
            }
        }
        store
    }

    /// Register a hook fired with the touched category id after every
    /// successful mutation. Any cached path derived from that category (or
    /// its descendants) must be treated as stale.
    pub fn on_invalidate(&self, hook: InvalidationHook) {
        self.hooks.write().push(hook);
    }

    /// Number of stored categories.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Insert a new category, enforcing global slug uniqueness.
    pub fn create(&self, input: NewCategory) -> Result<CategoryRecord, StoreError> {
        let mut records = self.records.write();

        if records.values().any(|r| r.slug == input.slug) {
            return Err(StoreError::SlugTaken { slug: input.slug });
        }

        let record = CategoryRecord {
            id: input.id.unwrap_or_else(|| Uuid::now_v7().to_string()),
            name: input.name,
            slug: input.slug,
            parent_id: input.parent_id,
        };
        records.insert(record.id.clone(), record.clone());
        drop(records);

        tracing::debug!(category = %record.id, slug = %record.slug, "category created");
        self.fire_hooks(&record.id);
        Ok(record)
    }

    /// Apply a partial update (rename, reslug, reparent).
    pub fn update(&self, id: &str, update: CategoryUpdate) -> Result<CategoryRecord, StoreError> {
        let mut records = self.records.write();

        if let Some(slug) = &update.slug {
            if records.values().any(|r| r.id != id && &r.slug == slug) {
                return Err(StoreError::SlugTaken { slug: slug.clone() });
            }
        }

        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::MissingCategory { id: id.to_string() })?;

        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(slug) = update.slug {
            record.slug = slug;
        }
        if let Some(parent_id) = update.parent_id {
            record.parent_id = parent_id;
        }
        let updated = record.clone();
        drop(records);

        tracing::debug!(category = %id, "category updated");
        self.fire_hooks(id);
        Ok(updated)
    }

    /// Delete a category. Referential integrity (children, product links) is
    /// the caller's policy; the store only removes the row.
    pub fn remove(&self, id: &str) -> Result<CategoryRecord, StoreError> {
        let removed = self
            .records
            .write()
            .remove(id)
            .ok_or_else(|| StoreError::MissingCategory { id: id.to_string() })?;

        tracing::debug!(category = %id, "category removed");
        self.fire_hooks(id);
        Ok(removed)
    }

    fn fire_hooks(&self, id: &str) {
        for hook in self.hooks.read().iter() {
            hook(id);
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn get_category(&self, id: &str) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(self.records.read().get(id).cloned())
    }

    async fn get_category_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .values()
            .find(|r| r.slug == slug)
            .cloned())
    }

    async fn list_categories(
        &self,
        filter: CategoryFilter,
    ) -> Result<Vec<CategoryRecord>, StoreError> {
        let mut matching: Vec<CategoryRecord> = self
            .records
            .read()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matching)
    }
}
