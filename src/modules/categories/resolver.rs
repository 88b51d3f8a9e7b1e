//! Ancestor-walk path resolution over the category store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use catena_kernel::settings::CatalogSettings;
use catena_store::{CategoryRecord, CategoryStore, StoreError};

use super::models::CategoryPath;

/// Failures during path resolution.
///
/// A missing starting category or a missing ancestor is *not* an error
/// (see [`PathResolver::resolve`]); only data-integrity breaks and store
/// failures surface here.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The parent chain revisited a category id. Fatal: the forest
    /// invariant is broken and walking further would never terminate.
    #[error("cycle detected in parent chain at category '{id}'")]
    CycleDetected { id: String },

    /// The walk exceeded the configured depth cap without reaching a root.
    #[error("ancestor walk from '{start}' exceeded {max_depth} levels")]
    DepthExceeded { start: String, max_depth: usize },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Resolves categories to their root-to-leaf [`CategoryPath`].
///
/// Purely a read-side query over the store: one `get_category` round trip
/// per ancestor level, strictly sequential within a single walk. Batch
/// resolution memoizes per call, never across calls, so there is no cached
/// state to invalidate when the tree mutates.
pub struct PathResolver {
    store: Arc<dyn CategoryStore>,
    max_depth: usize,
}

impl PathResolver {
    pub fn new(store: Arc<dyn CategoryStore>, settings: &CatalogSettings) -> Self {
        Self {
            store,
            max_depth: settings.max_depth,
        }
    }

    /// Resolve the full ancestor path of `id`.
    ///
    /// * Unknown `id` yields the empty path, distinguishing "absent" from
    ///   a root category's single-element path.
    /// * A missing ancestor mid-walk truncates the path at the break; the
    ///   result then starts below the true root. Strict callers can check
    ///   with [`PathResolver::is_fully_rooted`].
    pub async fn resolve(&self, id: &str) -> Result<CategoryPath, ResolveError> {
        let mut memo = HashMap::new();
        self.resolve_memoized(id, &mut memo).await
    }

    /// Resolve a batch of ids, preserving input order.
    ///
    /// Shares one memo map across the batch so common ancestors are
    /// fetched once.
    pub async fn resolve_many(&self, ids: &[String]) -> Result<Vec<CategoryPath>, ResolveError> {
        let mut memo = HashMap::new();
        let mut paths = Vec::with_capacity(ids.len());
        for id in ids {
            paths.push(self.resolve_memoized(id, &mut memo).await?);
        }
        Ok(paths)
    }

    /// Whether `path` reaches a true root, as opposed to having been
    /// truncated by a missing ancestor.
    pub async fn is_fully_rooted(&self, path: &CategoryPath) -> Result<bool, ResolveError> {
        let Some(first) = path.ids.first() else {
            return Ok(false);
        };
        match self.store.get_category(first).await? {
            Some(record) => Ok(record.parent_id.is_none()),
            None => Ok(false),
        }
    }

    async fn resolve_memoized(
        &self,
        id: &str,
        memo: &mut HashMap<String, CategoryPath>,
    ) -> Result<CategoryPath, ResolveError> {
        if let Some(hit) = memo.get(id) {
            return Ok(hit.clone());
        }

        // Walk leaf-to-root, accumulating records until we hit a root, a
        // missing ancestor, or a memoized ancestor path.
        let mut below_prefix: Vec<CategoryRecord> = Vec::new();
        let mut prefix = CategoryPath::empty();
        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor = Some(id.to_string());

        while let Some(current) = cursor.take() {
            if let Some(hit) = memo.get(&current) {
                prefix = hit.clone();
                break;
            }
            if !seen.insert(current.clone()) {
                return Err(ResolveError::CycleDetected { id: current });
            }
            if seen.len() > self.max_depth {
                return Err(ResolveError::DepthExceeded {
                    start: id.to_string(),
                    max_depth: self.max_depth,
                });
            }

            match self.store.get_category(&current).await? {
                Some(record) => {
                    cursor = record.parent_id.clone();
                    below_prefix.push(record);
                }
                None => {
                    if below_prefix.is_empty() {
                        // Starting category absent: structurally empty result.
                        tracing::debug!(category = %current, "category not found, empty path");
                    } else {
                        tracing::warn!(
                            category = %current,
                            start = %id,
                            "ancestor not found, truncating path"
                        );
                    }
                    break;
                }
            }
        }

        // The in-loop guard only counts freshly fetched levels; a memoized
        // prefix contributes its own depth, so cap the combined path too.
        if prefix.depth() + below_prefix.len() > self.max_depth {
            return Err(ResolveError::DepthExceeded {
                start: id.to_string(),
                max_depth: self.max_depth,
            });
        }

        let mut path = prefix;
        for record in below_prefix.iter().rev() {
            path.append(record);
        }

        memo.insert(id.to_string(), path.clone());
        Ok(path)
    }
}
