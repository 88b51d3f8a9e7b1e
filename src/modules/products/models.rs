use serde::{Deserialize, Deserializer, Serialize};

use crate::modules::categories::models::CategoryPath;

/// Category stub attached to a product (the store resolves the
/// many-to-many association before the product reaches this core).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Product as handed to the enricher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier for the product
    pub id: String,
    /// Display name of the product
    pub name: String,
    /// URL-friendly slug for the product
    pub slug: String,
    /// Associated categories; an absent or null field deserializes to
    /// empty rather than failing.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<CategoryRef>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<CategoryRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let categories = Option::<Vec<CategoryRef>>::deserialize(deserializer)?;
    Ok(categories.unwrap_or_default())
}

impl Product {
    /// Ids of the associated categories, in association order.
    pub fn category_ids(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.id.clone()).collect()
    }
}

/// Category stub plus its resolved path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedCategory {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub path: CategoryPath,
}

/// Product with materialized category paths.
///
/// `category_paths[i]` is the `fullPath` of `categories[i]`; the two
/// collections always have the same length (both empty for a product with
/// no associations).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProduct {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub categories: Vec<EnrichedCategory>,
    pub category_paths: Vec<String>,
}

impl EnrichedProduct {
    /// Whether a requested slash-separated path is consistent with at least
    /// one of this product's category paths (permissive containment; see
    /// [`crate::modules::categories::matching`]).
    pub fn matches_path(&self, requested: &str) -> bool {
        crate::modules::categories::matching::matches_any(requested, &self.category_paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_categories_field_deserializes_to_empty() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"MacBook Pro","slug":"macbook-pro"}"#)
                .unwrap();
        assert!(product.categories.is_empty());
        assert!(product.category_ids().is_empty());
    }

    #[test]
    fn null_categories_field_deserializes_to_empty() {
        let product: Product = serde_json::from_str(
            r#"{"id":"p1","name":"MacBook Pro","slug":"macbook-pro","categories":null}"#,
        )
        .unwrap();
        assert!(product.categories.is_empty());
    }

    #[test]
    fn category_ids_preserve_association_order() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "p1",
                "name": "MacBook Pro",
                "slug": "macbook-pro",
                "categories": [
                    {"id": "3", "name": "Laptops", "slug": "laptops"},
                    {"id": "9", "name": "Deals", "slug": "deals"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(product.category_ids(), vec!["3", "9"]);
    }

    #[test]
    fn enriched_product_serializes_camel_case_paths() {
        let enriched = EnrichedProduct {
            id: "p1".into(),
            name: "MacBook Pro".into(),
            slug: "macbook-pro".into(),
            categories: Vec::new(),
            category_paths: vec!["electronics/computers/laptops".into()],
        };
        let json = serde_json::to_value(&enriched).unwrap();
        assert_eq!(json["categoryPaths"][0], "electronics/computers/laptops");
    }

    #[test]
    fn path_lookup_uses_permissive_containment() {
        let enriched = EnrichedProduct {
            id: "p1".into(),
            name: "MacBook Pro".into(),
            slug: "macbook-pro".into(),
            categories: Vec::new(),
            category_paths: vec!["electronics/computers/laptops".into()],
        };

        assert!(enriched.matches_path("electronics/computers/laptops"));
        assert!(enriched.matches_path("computers/laptops"));
        assert!(enriched.matches_path("electronics"));
        assert!(!enriched.matches_path("toys"));
        assert!(!enriched.matches_path(""));
    }
}
