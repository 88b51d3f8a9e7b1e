//! Attaches resolved category paths to products.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use catena_kernel::settings::CatalogSettings;

use crate::modules::categories::resolver::{PathResolver, ResolveError};

use super::models::{EnrichedCategory, EnrichedProduct, Product};

/// Per-product enrichment failures.
#[derive(Debug, Error)]
pub enum EnrichError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("enrichment timed out after {0:?}")]
    Timeout(Duration),

    #[error("enrichment task failed: {0}")]
    TaskFailed(String),
}

/// Resolves one [`CategoryPath`](crate::modules::categories::models::CategoryPath)
/// per associated category and collects the full-path strings in
/// association order.
///
/// Batch enrichment runs one task per product; a slow or failing product
/// occupies only its own slot in the result.
#[derive(Clone)]
pub struct ProductEnricher {
    resolver: Arc<PathResolver>,
    timeout: Duration,
}

impl ProductEnricher {
    pub fn new(resolver: Arc<PathResolver>, settings: &CatalogSettings) -> Self {
        Self {
            resolver,
            timeout: Duration::from_millis(settings.enrich_timeout_ms),
        }
    }

    /// Enrich a single product.
    ///
    /// A product without category associations enriches to empty
    /// collections; that is a valid state, not an error.
    pub async fn enrich(&self, product: Product) -> Result<EnrichedProduct, EnrichError> {
        let Product {
            id,
            name,
            slug,
            categories,
        } = product;

        if categories.is_empty() {
            return Ok(EnrichedProduct {
                id,
                name,
                slug,
                categories: Vec::new(),
                category_paths: Vec::new(),
            });
        }

        let ids: Vec<String> = categories.iter().map(|c| c.id.clone()).collect();
        // One memo map per product, so shared ancestors across its
        // categories are fetched once.
        let paths = self.resolver.resolve_many(&ids).await?;

        let category_paths: Vec<String> =
            paths.iter().map(|path| path.full_path.clone()).collect();
        let categories: Vec<EnrichedCategory> = categories
            .into_iter()
            .zip(paths)
            .map(|(stub, path)| EnrichedCategory {
                id: stub.id,
                name: stub.name,
                slug: stub.slug,
                path,
            })
            .collect();

        Ok(EnrichedProduct {
            id,
            name,
            slug,
            categories,
            category_paths,
        })
    }

    /// Enrich a batch, preserving input order.
    ///
    /// Products are enriched concurrently, each bounded by the configured
    /// timeout; failures are reported in-slot and never abort the batch.
    pub async fn enrich_many(
        &self,
        products: Vec<Product>,
    ) -> Vec<Result<EnrichedProduct, EnrichError>> {
        let handles: Vec<_> = products
            .into_iter()
            .map(|product| {
                let enricher = self.clone();
                tokio::spawn(async move {
                    tokio::time::timeout(enricher.timeout, enricher.enrich(product)).await
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(match handle.await {
                Ok(Ok(enriched)) => enriched,
                Ok(Err(_elapsed)) => Err(EnrichError::Timeout(self.timeout)),
                Err(join_err) => Err(EnrichError::TaskFailed(join_err.to_string())),
            });
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catena_store::{
        CategoryFilter, CategoryRecord, CategoryStore, MemoryStore, StoreError,
    };

    use crate::modules::products::models::CategoryRef;

    fn record(id: &str, name: &str, slug: &str, parent: Option<&str>) -> CategoryRecord {
        CategoryRecord {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            parent_id: parent.map(Into::into),
        }
    }

    fn stub(id: &str, name: &str, slug: &str) -> CategoryRef {
        CategoryRef {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
        }
    }

    fn enricher_over(store: Arc<dyn CategoryStore>) -> ProductEnricher {
        let settings = CatalogSettings::default();
        ProductEnricher::new(Arc::new(PathResolver::new(store, &settings)), &settings)
    }

    fn catalog_store() -> Arc<MemoryStore> {
        Arc::new(MemoryStore::with_records([
            record("1", "Electronics", "electronics", None),
            record("2", "Computers", "computers", Some("1")),
            record("3", "Laptops", "laptops", Some("2")),
            record("9", "Deals", "deals", None),
        ]))
    }

    fn macbook() -> Product {
        Product {
            id: "p1".into(),
            name: "MacBook Pro".into(),
            slug: "macbook-pro".into(),
            categories: vec![
                stub("3", "Laptops", "laptops"),
                stub("9", "Deals", "deals"),
            ],
        }
    }

    #[tokio::test]
    async fn enrich_attaches_one_path_per_category_in_order() {
        let enricher = enricher_over(catalog_store());
        let enriched = enricher.enrich(macbook()).await.unwrap();

        assert_eq!(enriched.categories.len(), 2);
        assert_eq!(enriched.category_paths.len(), 2);
        assert_eq!(
            enriched.category_paths,
            vec!["electronics/computers/laptops", "deals"]
        );
        assert_eq!(enriched.categories[0].path.ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn product_without_associations_enriches_to_empty() {
        let enricher = enricher_over(catalog_store());
        let bare = Product {
            id: "p2".into(),
            name: "Gift Card".into(),
            slug: "gift-card".into(),
            categories: Vec::new(),
        };

        let enriched = enricher.enrich(bare).await.unwrap();
        assert!(enriched.categories.is_empty());
        assert!(enriched.category_paths.is_empty());
    }

    #[tokio::test]
    async fn unknown_category_association_yields_empty_path_slot() {
        let enricher = enricher_over(catalog_store());
        let product = Product {
            id: "p3".into(),
            name: "Mystery".into(),
            slug: "mystery".into(),
            categories: vec![stub("ghost", "Ghost", "ghost")],
        };

        let enriched = enricher.enrich(product).await.unwrap();
        assert_eq!(enriched.category_paths, vec![""]);
        assert!(enriched.categories[0].path.is_empty());
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let enricher = enricher_over(catalog_store());
        let products = vec![
            macbook(),
            Product {
                id: "p2".into(),
                name: "Gift Card".into(),
                slug: "gift-card".into(),
                categories: Vec::new(),
            },
        ];

        let results = enricher.enrich_many(products).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap().id, "p1");
        assert_eq!(results[1].as_ref().unwrap().id, "p2");
    }

    #[tokio::test]
    async fn one_failing_product_does_not_abort_the_batch() {
        // "a" <-> "b" form a cycle; only the product touching it fails.
        let store = Arc::new(MemoryStore::with_records([
            record("1", "Electronics", "electronics", None),
            record("a", "A", "a", Some("b")),
            record("b", "B", "b", Some("a")),
        ]));
        let enricher = enricher_over(store);

        let products = vec![
            Product {
                id: "ok".into(),
                name: "Fine".into(),
                slug: "fine".into(),
                categories: vec![stub("1", "Electronics", "electronics")],
            },
            Product {
                id: "broken".into(),
                name: "Broken".into(),
                slug: "broken".into(),
                categories: vec![stub("a", "A", "a")],
            },
        ];

        let results = enricher.enrich_many(products).await;
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(EnrichError::Resolve(ResolveError::CycleDetected { .. }))
        ));
    }

    #[tokio::test]
    async fn slow_store_is_bounded_by_the_timeout() {
        struct StallingStore;

        #[async_trait]
        impl CategoryStore for StallingStore {
            async fn get_category(
                &self,
                _id: &str,
            ) -> Result<Option<CategoryRecord>, StoreError> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(None)
            }

            async fn get_category_by_slug(
                &self,
                _slug: &str,
            ) -> Result<Option<CategoryRecord>, StoreError> {
                Ok(None)
            }

            async fn list_categories(
                &self,
                _filter: CategoryFilter,
            ) -> Result<Vec<CategoryRecord>, StoreError> {
                Ok(Vec::new())
            }
        }

        let settings = CatalogSettings {
            enrich_timeout_ms: 20,
            ..Default::default()
        };
        let resolver = Arc::new(PathResolver::new(Arc::new(StallingStore), &settings));
        let enricher = ProductEnricher::new(resolver, &settings);

        let product = Product {
            id: "slow".into(),
            name: "Slow".into(),
            slug: "slow".into(),
            categories: vec![stub("1", "Electronics", "electronics")],
        };

        let results = enricher.enrich_many(vec![product]).await;
        assert!(matches!(results[0], Err(EnrichError::Timeout(_))));
    }
}
