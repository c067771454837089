//! Application wiring: storage, module registry, router and server lifecycle.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use shelf_kernel::settings::Settings;
use shelf_kernel::{InitCtx, ModuleRegistry};
use sqlx::PgPool;

use crate::modules;
use crate::modules::books::repo::{BookRepository, InMemoryBookRepository, PgBookRepository};

/// Where book records are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Storage {
    #[default]
    Postgres,
    /// Process memory; everything is lost on exit.
    InMemory,
}

/// Registry holding every application module, backed by `books`.
pub fn registry(books: Arc<dyn BookRepository>) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, books);
    registry
}

/// HTTP router for the registered modules.
pub fn router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    shelf_http::build_router(registry, &settings.server)
}

/// Run the service until a shutdown signal arrives.
pub async fn serve(settings: Settings, storage: Storage) -> anyhow::Result<()> {
    let (books, pool): (Arc<dyn BookRepository>, Option<PgPool>) = match storage {
        Storage::Postgres => {
            let pool = shelf_db::connect(&settings.database).await?;
            (Arc::new(PgBookRepository::new(pool.clone())), Some(pool))
        }
        Storage::InMemory => {
            tracing::warn!("using in-memory book storage; records are lost on exit");
            (Arc::new(InMemoryBookRepository::new()), None)
        }
    };

    let registry = registry(books);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;

    if let Some(pool) = &pool {
        if settings.database.synchronize {
            let applied = shelf_db::run_migrations(pool, &registry.collect_migrations())
                .await
                .context("schema synchronisation failed")?;
            tracing::info!(applied, "schema synchronised");
        } else {
            tracing::info!("schema synchronisation disabled");
        }
    }

    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(router(&registry, &settings), &settings.server).await;

    registry.stop_all().await?;
    if let Some(pool) = pool {
        pool.close().await;
    }

    served
}

/// Apply pending migrations and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = shelf_db::connect(&settings.database).await?;
    let registry = registry(Arc::new(PgBookRepository::new(pool.clone())));

    let applied = shelf_db::run_migrations(&pool, &registry.collect_migrations()).await;
    pool.close().await;

    applied
}
