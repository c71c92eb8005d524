//! Catalog store implementations.
//!
//! Both backends enforce the same constraints: unique brand and category
//! names, one product per (brand, category), no dangling references, and
//! cascade removal of a deleted brand's products.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCatalogStore;
pub use postgres::PostgresCatalogStore;
