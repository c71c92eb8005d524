use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use pricelens_catalog::CatalogStore;
use pricelens_infra::{
    AppConfig, CatalogSeed, InMemoryCatalogStore, PostgresCatalogStore, SeedSource, StorageBackend,
};

/// Shared handles the request handlers work with.
///
/// The store is the only shared state; handlers pass it into the catalog
/// operations on every call.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn CatalogStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn CatalogStore> = match &config.storage {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory catalog store");
            Arc::new(InMemoryCatalogStore::new())
        }
        StorageBackend::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("failed to connect to postgres")?;
            let store = PostgresCatalogStore::new(pool);
            store.migrate().await.context("failed to apply catalog schema")?;
            tracing::info!("using postgres catalog store");
            Arc::new(store)
        }
    };

    let seed = match &config.seed {
        SeedSource::Builtin => Some(CatalogSeed::builtin()),
        SeedSource::File(path) => Some(
            CatalogSeed::from_path(path)
                .with_context(|| format!("failed to load seed {}", path.display()))?,
        ),
        SeedSource::Disabled => None,
    };
    if let Some(seed) = seed {
        seed.apply(store.as_ref())
            .await
            .context("failed to seed catalog")?;
    }

    Ok(AppServices::new(store))
}
