use std::sync::Arc;

use anyhow::Context;
use catena_kernel::settings::{Environment, Settings};
use catena_kernel::{InitCtx, ModuleRegistry};
use catena_store::{memory::NewCategory, MemoryStore};

use catena_app::modules;
use catena_app::utils::slugify;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catena settings")?;
    catena_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        store = %settings.store.endpoint,
        "catena-app bootstrap starting"
    );

    let store = Arc::new(MemoryStore::new());
    store.on_invalidate(Box::new(|id| {
        tracing::debug!(category = %id, "category mutated, cached paths stale");
    }));

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store.clone());

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_core_modules(&ctx).await?;
    registry.init_custom_modules(&ctx).await?;

    let migrations = registry.collect_migrations();
    tracing::info!(count = migrations.len(), "collected module migrations");

    registry.start_core_modules(&ctx).await?;
    registry.start_custom_modules(&ctx).await?;

    if settings.environment == Environment::Local {
        demo_resolution(&store, &settings)
            .await
            .with_context(|| "demo resolution failed")?;
    }

    tracing::info!("catena-app bootstrap complete");

    registry.stop_custom_modules().await?;
    registry.stop_core_modules().await?;
    Ok(())
}

/// Seed a small tree and log a resolved path, so a local run shows the
/// core working end to end.
async fn demo_resolution(store: &Arc<MemoryStore>, settings: &Settings) -> anyhow::Result<()> {
    let mut parent_id = None;
    let mut leaf_id = String::new();
    for name in ["Electronics", "Computers", "Laptops"] {
        let record = store.create(NewCategory {
            name: name.to_string(),
            slug: slugify(name),
            parent_id: parent_id.take(),
            ..Default::default()
        })?;
        leaf_id = record.id.clone();
        parent_id = Some(record.id);
    }

    let module = catena_app::categories::CategoriesModule::new(store.clone());
    let resolver = module.resolver(&settings.catalog);
    let path = resolver.resolve(&leaf_id).await?;

    tracing::info!(
        full_path = %path.full_path,
        depth = path.depth(),
        "demo category resolved"
    );
    Ok(())
}
