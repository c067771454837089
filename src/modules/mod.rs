pub mod books;

use std::sync::Arc;

use shelf_kernel::ModuleRegistry;

use books::repo::BookRepository;

/// Register all application modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, books: Arc<dyn BookRepository>) {
    registry.register(books::create_module(books));
}
