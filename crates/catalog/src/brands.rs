//! Brand lifecycle: `absent → active → (renamed) active → deleted`.
//!
//! Name uniqueness is pre-checked here, but the store's own constraint is the
//! authoritative guard; a duplicate it reports at write time surfaces as the
//! same `Conflict` as one found by the pre-check.

use tracing::{info, instrument, warn};

use pricelens_core::{BrandId, DomainError};

use crate::error::CatalogResult;
use crate::model::{normalize_name, Brand};
use crate::store::CatalogStore;

/// Register a new brand under a fresh id. The name is trimmed first.
#[instrument(skip(store), err)]
pub async fn create_brand<S>(store: &S, name: &str) -> CatalogResult<Brand>
where
    S: CatalogStore + ?Sized,
{
    let name = normalize_name(name)?;
    let name = name.as_str();

    if store.find_brand_by_name(name).await?.is_some() {
        warn!(name, "rejected duplicate brand");
        return Err(DomainError::conflict(format!("brand already exists: {name}")).into());
    }

    let brand = store.insert_brand(Brand::new(name)).await?;
    info!(brand_id = %brand.id, name = %brand.name, "brand created");
    Ok(brand)
}

/// Rename a brand. Renaming to its current name is a successful no-op.
#[instrument(skip(store), err)]
pub async fn update_brand<S>(store: &S, id: BrandId, name: &str) -> CatalogResult<Brand>
where
    S: CatalogStore + ?Sized,
{
    let name = normalize_name(name)?;
    let name = name.as_str();

    let brand = store
        .find_brand(id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("brand not found with id: {id}")))?;

    if let Some(holder) = store.find_brand_by_name(name).await? {
        if holder.id != id {
            warn!(brand_id = %id, name, holder_id = %holder.id, "rejected rename to taken name");
            return Err(DomainError::conflict(format!("brand name already in use: {name}")).into());
        }
    }

    let previous = brand.name.clone();
    let updated = store.update_brand(brand.renamed(name)).await?;
    info!(brand_id = %updated.id, from = %previous, to = %updated.name, "brand renamed");
    Ok(updated)
}

/// Delete a brand and, with it, every product it owns.
#[instrument(skip(store), err)]
pub async fn delete_brand<S>(store: &S, id: BrandId) -> CatalogResult<()>
where
    S: CatalogStore + ?Sized,
{
    let not_found = || DomainError::not_found(format!("brand not found with id: {id}"));

    if store.find_brand(id).await?.is_none() {
        return Err(not_found().into());
    }

    // Another request may have removed it since the lookup.
    if !store.delete_brand(id).await? {
        return Err(not_found().into());
    }

    info!(brand_id = %id, "brand deleted");
    Ok(())
}

/// All category names in store enumeration order.
#[instrument(skip(store), err)]
pub async fn list_categories<S>(store: &S) -> CatalogResult<Vec<String>>
where
    S: CatalogStore + ?Sized,
{
    let categories = store.list_categories().await?;
    Ok(categories.into_iter().map(|c| c.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use pricelens_core::CategoryId;

    use crate::model::{Category, Product, ProductListing};
    use crate::store::{StoreError, StoreResult};

    /// Store whose reads never see the rows a concurrent writer already
    /// committed: every pre-check passes and only the write-time constraint
    /// can catch the duplicate.
    #[derive(Default)]
    struct LaggingStore {
        committed: Mutex<Vec<Brand>>,
        delete_misses: bool,
    }

    #[async_trait::async_trait]
    impl CatalogStore for LaggingStore {
        async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
            Ok(vec![])
        }

        async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>> {
            Ok(Some(Brand { id, name: "stale".into() }))
        }

        async fn find_brand_by_name(&self, _name: &str) -> StoreResult<Option<Brand>> {
            Ok(None)
        }

        async fn insert_brand(&self, brand: Brand) -> StoreResult<Brand> {
            let mut committed = self.committed.lock().unwrap();
            if committed.iter().any(|b| b.name == brand.name) {
                return Err(StoreError::duplicate("brand", brand.name));
            }
            committed.push(brand.clone());
            Ok(brand)
        }

        async fn update_brand(&self, brand: Brand) -> StoreResult<Brand> {
            let committed = self.committed.lock().unwrap();
            if committed.iter().any(|b| b.name == brand.name && b.id != brand.id) {
                return Err(StoreError::duplicate("brand", brand.name));
            }
            Ok(brand)
        }

        async fn delete_brand(&self, _id: BrandId) -> StoreResult<bool> {
            Ok(!self.delete_misses)
        }

        async fn list_categories(&self) -> StoreResult<Vec<Category>> {
            Err(StoreError::Backend("connection refused".into()))
        }

        async fn find_category_by_name(&self, _name: &str) -> StoreResult<Option<Category>> {
            Ok(None)
        }

        async fn insert_category(&self, category: Category) -> StoreResult<Category> {
            Ok(category)
        }

        async fn insert_product(&self, product: Product) -> StoreResult<Product> {
            Ok(product)
        }

        async fn cheapest_in_category(&self, _: CategoryId) -> StoreResult<Option<ProductListing>> {
            Ok(None)
        }

        async fn priciest_in_category(&self, _: CategoryId) -> StoreResult<Option<ProductListing>> {
            Ok(None)
        }

        async fn products_of_brand(&self, _: BrandId) -> StoreResult<Vec<ProductListing>> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn duplicate_caught_at_write_time_is_a_conflict() {
        let store = LaggingStore::default();

        create_brand(&store, "C").await.unwrap();
        let err = create_brand(&store, "C").await.unwrap_err();

        assert!(err.is_conflict(), "expected conflict, got {err:?}");
        assert_eq!(store.committed.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rename_collision_caught_at_write_time_is_a_conflict() {
        let store = LaggingStore::default();
        create_brand(&store, "A").await.unwrap();

        let err = update_brand(&store, BrandId::new(), "A").await.unwrap_err();
        assert!(err.is_conflict(), "expected conflict, got {err:?}");
    }

    #[tokio::test]
    async fn names_are_trimmed_before_storing() {
        let store = LaggingStore::default();

        let created = create_brand(&store, "  Z  ").await.unwrap();
        assert_eq!(created.name, "Z");

        let err = create_brand(&store, "Z").await.unwrap_err();
        assert!(err.is_conflict(), "expected conflict, got {err:?}");
    }

    #[tokio::test]
    async fn blank_and_overlong_names_are_rejected_before_any_write() {
        let store = LaggingStore::default();
        let too_long = "x".repeat(crate::model::MAX_NAME_LEN + 1);

        for name in ["", "   ", too_long.as_str()] {
            let err = create_brand(&store, name).await.unwrap_err();
            assert!(
                matches!(err, crate::error::CatalogError::Domain(DomainError::Validation(_))),
                "expected validation error, got {err:?}"
            );

            let err = update_brand(&store, BrandId::new(), name).await.unwrap_err();
            assert!(
                matches!(err, crate::error::CatalogError::Domain(DomainError::Validation(_))),
                "expected validation error, got {err:?}"
            );
        }

        assert!(store.committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_racing_another_delete_is_not_found() {
        let store = LaggingStore {
            delete_misses: true,
            ..Default::default()
        };

        let err = delete_brand(&store, BrandId::new()).await.unwrap_err();
        assert!(err.is_not_found(), "expected not found, got {err:?}");
    }

    #[tokio::test]
    async fn backend_failure_is_surfaced_untouched() {
        let store = LaggingStore::default();

        let err = list_categories(&store).await.unwrap_err();
        assert_eq!(
            err,
            crate::error::CatalogError::Unavailable("connection refused".into())
        );
    }
}
