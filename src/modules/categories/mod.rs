pub mod matching;
pub mod models;
pub mod resolver;
pub mod tree;

use std::sync::Arc;

use async_trait::async_trait;
use catena_kernel::settings::CatalogSettings;
use catena_kernel::{InitCtx, Migration, Module};
use catena_store::{CategoryFilter, CategoryStore, StoreError};

use resolver::PathResolver;
use tree::CategoryForest;

/// Categories module: path resolution and tree building over the store.
pub struct CategoriesModule {
    store: Arc<dyn CategoryStore>,
}

impl CategoriesModule {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Build a resolver configured from catalog settings.
    pub fn resolver(&self, settings: &CatalogSettings) -> PathResolver {
        PathResolver::new(self.store.clone(), settings)
    }

    /// Load all categories and assemble the navigation forest.
    pub async fn forest(&self) -> Result<CategoryForest, StoreError> {
        let records = self.store.list_categories(CategoryFilter::all()).await?;
        Ok(CategoryForest::build(records))
    }
}

#[async_trait]
impl Module for CategoriesModule {
    fn name(&self) -> &'static str {
        "categories"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            max_depth = ctx.settings.catalog.max_depth,
            "categories module initialized"
        );
        Ok(())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                DEFINE TABLE category SCHEMAFULL;
                DEFINE FIELD name      ON category TYPE string ASSERT $value != "" AND string::len($value) <= 100;
                DEFINE FIELD slug      ON category TYPE string ASSERT $value != "" AND string::len($value) <= 200;
                DEFINE FIELD parent_id ON category TYPE option<record<category>>;
                DEFINE INDEX category_slug_unique ON category FIELDS slug UNIQUE;
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "categories module stopped");
        Ok(())
    }
}

/// Create a new instance of the categories module
pub fn create_module(store: Arc<dyn CategoryStore>) -> Arc<CategoriesModule> {
    Arc::new(CategoriesModule::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catena_store::{CategoryRecord, MemoryStore};

    #[tokio::test]
    async fn forest_is_built_from_the_full_store() {
        let store = Arc::new(MemoryStore::with_records([
            CategoryRecord {
                id: "1".into(),
                name: "Electronics".into(),
                slug: "electronics".into(),
                parent_id: None,
            },
            CategoryRecord {
                id: "2".into(),
                name: "Computers".into(),
                slug: "computers".into(),
                parent_id: Some("1".into()),
            },
        ]));
        let module = CategoriesModule::new(store);

        let forest = module.forest().await.unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest.roots[0].id, "1");
    }

    #[test]
    fn migration_declares_unique_slug_index() {
        let module = CategoriesModule::new(Arc::new(MemoryStore::new()));
        let migrations = module.migrations();
        assert_eq!(migrations.len(), 1);
        assert!(migrations[0].up.contains("category_slug_unique"));
    }
}
