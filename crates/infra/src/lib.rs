//! Infrastructure layer: catalog stores, seeding, configuration.

pub mod config;
pub mod seed;
pub mod store;


pub use config::{AppConfig, ConfigError, SeedSource, StorageBackend};
pub use seed::{CatalogSeed, SeedError, SeedProduct, SeedReport};
pub use store::{InMemoryCatalogStore, PostgresCatalogStore};
