pub mod enricher;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use catena_kernel::settings::CatalogSettings;
use catena_kernel::{InitCtx, Migration, Module};
use catena_store::CategoryStore;

use crate::modules::categories::resolver::PathResolver;
use enricher::ProductEnricher;

/// Products module: category path enrichment for products.
pub struct ProductsModule {
    store: Arc<dyn CategoryStore>,
}

impl ProductsModule {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Build an enricher configured from catalog settings.
    pub fn enricher(&self, settings: &CatalogSettings) -> ProductEnricher {
        let resolver = Arc::new(PathResolver::new(self.store.clone(), settings));
        ProductEnricher::new(resolver, settings)
    }
}

#[async_trait]
impl Module for ProductsModule {
    fn name(&self) -> &'static str {
        "products"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            enrich_timeout_ms = ctx.settings.catalog.enrich_timeout_ms,
            "products module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                DEFINE TABLE product SCHEMAFULL;
                DEFINE FIELD name ON product TYPE string ASSERT $value != "";
                DEFINE FIELD slug ON product TYPE string ASSERT $value != "";
                DEFINE INDEX product_slug_unique ON product FIELDS slug UNIQUE;
                DEFINE TABLE product_category SCHEMAFULL;
                DEFINE FIELD product_id  ON product_category TYPE record<product>;
                DEFINE FIELD category_id ON product_category TYPE record<category>;
                DEFINE INDEX product_category_unique ON product_category FIELDS product_id, category_id UNIQUE;
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module stopped");
        Ok(())
    }
}

/// Create a new instance of the products module
pub fn create_module(store: Arc<dyn CategoryStore>) -> Arc<ProductsModule> {
    Arc::new(ProductsModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catena_store::MemoryStore;

    #[test]
    fn migration_links_products_to_categories() {
        let module = ProductsModule::new(Arc::new(MemoryStore::new()));
        let migrations = module.migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("product_category"));
    }
}
