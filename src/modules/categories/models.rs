use serde::{Deserialize, Serialize};
use thiserror::Error;

use catena_store::CategoryRecord;

/// Domain alias for the store's category row; the core adds no extra fields.
pub type Category = CategoryRecord;

pub const NAME_MAX_LEN: usize = 100;
pub const SLUG_MAX_LEN: usize = 200;

/// Field-level validation failures for category input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryFieldError {
    #[error("name must be 1-{NAME_MAX_LEN} characters")]
    InvalidName,

    #[error("slug must be 1-{SLUG_MAX_LEN} characters of lowercase alphanumerics and hyphens")]
    InvalidSlug,
}

/// Validate a category name (1-100 characters).
pub fn validate_name(name: &str) -> Result<(), CategoryFieldError> {
    let len = name.chars().count();
    if len == 0 || len > NAME_MAX_LEN {
        return Err(CategoryFieldError::InvalidName);
    }
    Ok(())
}

/// Validate a category slug (1-200 characters, `[a-z0-9-]`).
pub fn validate_slug(slug: &str) -> Result<(), CategoryFieldError> {
    if slug.is_empty() || slug.len() > SLUG_MAX_LEN {
        return Err(CategoryFieldError::InvalidSlug);
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CategoryFieldError::InvalidSlug);
    }
    Ok(())
}

/// Materialized root-to-leaf ancestor chain for one category.
///
/// The three sequences are parallel (same length, same order) and
/// `full_path` is the slugs joined by `/` with no surrounding slashes.
/// An empty path means the starting category did not exist; a true root
/// resolves to exactly one element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPath {
    pub ids: Vec<String>,
    pub names: Vec<String>,
    pub slugs: Vec<String>,
    pub full_path: String,
}

impl CategoryPath {
    /// The empty path, produced when the starting category is unknown.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a path from records ordered root first.
    pub fn from_chain(chain: impl IntoIterator<Item = CategoryRecord>) -> Self {
        let mut path = Self::empty();
        for record in chain {
            path.append(&record);
        }
        path
    }

    /// Append one more descendant level.
    pub(crate) fn append(&mut self, record: &CategoryRecord) {
        if !self.full_path.is_empty() {
            self.full_path.push('/');
        }
        self.full_path.push_str(&record.slug);
        self.ids.push(record.id.clone());
        self.names.push(record.name.clone());
        self.slugs.push(record.slug.clone());
    }

    /// Number of levels in the path.
    pub fn depth(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
