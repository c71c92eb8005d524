//! Catalog pricing domain.
//!
//! This crate holds the pricing aggregations and the brand lifecycle rules.
//! Storage is reached only through the [`CatalogStore`] capability trait, which
//! every operation receives as a parameter; the crate itself performs no IO.

pub mod brands;
pub mod error;
pub mod model;
pub mod pricing;
pub mod store;

pub use brands::{create_brand, delete_brand, list_categories, update_brand};
pub use error::{CatalogError, CatalogResult};
pub use model::{normalize_name, Brand, Category, Product, ProductListing, MAX_NAME_LEN};
pub use pricing::{
    category_price_range, lowest_price_per_category, lowest_total_brand, BrandPrice,
    CategoryLowest, CategoryPrice, CategoryPriceRange, LowestPricePerCategory, LowestTotalBrand,
};
pub use store::{CatalogStore, StoreError, StoreResult};
