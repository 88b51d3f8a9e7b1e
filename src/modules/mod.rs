pub mod categories;
pub mod products;

use std::sync::Arc;

use catena_kernel::ModuleRegistry;
use catena_store::CategoryStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<dyn CategoryStore>) {
    registry.register_custom(categories::create_module(store.clone()));
    registry.register_custom(products::create_module(store));
}
