//! Catalog storage boundary.
//!
//! The pricing and lifecycle operations depend on these named capabilities
//! rather than on a concrete engine. Implementations own the uniqueness and
//! referential-integrity constraints; the domain only pre-checks.

use std::sync::Arc;

use thiserror::Error;

use pricelens_core::{BrandId, CategoryId};

use crate::model::{Brand, Category, Product, ProductListing};

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate {entity}: {key}")]
    Duplicate { entity: &'static str, key: String },

    /// The write referenced a row that does not exist.
    #[error("missing {entity}: {key}")]
    MissingReference { entity: &'static str, key: String },

    /// The backend failed (connection, lock poisoning, bad row data).
    #[error("storage backend failure: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    pub fn missing(entity: &'static str, key: impl Into<String>) -> Self {
        Self::MissingReference {
            entity,
            key: key.into(),
        }
    }
}

/// Capabilities the catalog needs from its store.
///
/// Enumeration order (`list_brands`, `list_categories`, `products_of_brand`)
/// is creation order. The extreme-price queries break price ties by brand
/// name, lexicographically first wins, for both the minimum and the maximum.
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_brands(&self) -> StoreResult<Vec<Brand>>;

    async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>>;

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>>;

    /// Persist a new brand. Fails with `Duplicate` if the name is taken.
    async fn insert_brand(&self, brand: Brand) -> StoreResult<Brand>;

    /// Replace the brand row with the same id.
    ///
    /// Fails with `MissingReference` if the id is unknown and with `Duplicate`
    /// if another brand holds the name.
    async fn update_brand(&self, brand: Brand) -> StoreResult<Brand>;

    /// Remove a brand together with its products. Returns `false` if the id
    /// was unknown.
    async fn delete_brand(&self, id: BrandId) -> StoreResult<bool>;

    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;

    /// Persist a new category. Fails with `Duplicate` if the name is taken.
    async fn insert_category(&self, category: Category) -> StoreResult<Category>;

    /// Persist a new product.
    ///
    /// Fails with `MissingReference` if its brand or category is unknown and
    /// with `Duplicate` if the (brand, category) pair already has a product.
    async fn insert_product(&self, product: Product) -> StoreResult<Product>;

    /// The lowest-priced product in a category, if any.
    async fn cheapest_in_category(&self, category_id: CategoryId)
        -> StoreResult<Option<ProductListing>>;

    /// The highest-priced product in a category, if any.
    async fn priciest_in_category(&self, category_id: CategoryId)
        -> StoreResult<Option<ProductListing>>;

    /// All products of a brand.
    async fn products_of_brand(&self, brand_id: BrandId) -> StoreResult<Vec<ProductListing>>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        (**self).list_brands().await
    }

    async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>> {
        (**self).find_brand(id).await
    }

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        (**self).find_brand_by_name(name).await
    }

    async fn insert_brand(&self, brand: Brand) -> StoreResult<Brand> {
        (**self).insert_brand(brand).await
    }

    async fn update_brand(&self, brand: Brand) -> StoreResult<Brand> {
        (**self).update_brand(brand).await
    }

    async fn delete_brand(&self, id: BrandId) -> StoreResult<bool> {
        (**self).delete_brand(id).await
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        (**self).list_categories().await
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        (**self).find_category_by_name(name).await
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        (**self).insert_category(category).await
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        (**self).insert_product(product).await
    }

    async fn cheapest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        (**self).cheapest_in_category(category_id).await
    }

    async fn priciest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        (**self).priciest_in_category(category_id).await
    }

    async fn products_of_brand(&self, brand_id: BrandId) -> StoreResult<Vec<ProductListing>> {
        (**self).products_of_brand(brand_id).await
    }
}
