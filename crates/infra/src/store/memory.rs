use std::cmp::Ordering;
use std::sync::RwLock;

use pricelens_catalog::{
    Brand, CatalogStore, Category, Product, ProductListing, StoreError, StoreResult,
};
use pricelens_core::{BrandId, CategoryId, Entity};

/// Insertion-ordered rows of one entity kind.
#[derive(Debug)]
struct Table<E> {
    rows: Vec<E>,
}

impl<E> Default for Table<E> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<E: Entity + Clone> Table<E> {
    fn get(&self, id: &E::Id) -> Option<&E> {
        self.rows.iter().find(|row| row.id() == id)
    }

    fn find(&self, pred: impl Fn(&E) -> bool) -> Option<&E> {
        self.rows.iter().find(|row| pred(*row))
    }

    fn push(&mut self, row: E) {
        self.rows.push(row);
    }

    /// Replace the row with the same id in place. Returns `false` if absent.
    fn replace(&mut self, row: E) -> bool {
        match self.rows.iter_mut().find(|r| r.id() == row.id()) {
            Some(slot) => {
                *slot = row;
                true
            }
            None => false,
        }
    }

    fn remove(&mut self, id: &E::Id) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id() != id);
        self.rows.len() != before
    }

    fn all(&self) -> Vec<E> {
        self.rows.clone()
    }
}

#[derive(Debug, Default)]
struct Tables {
    brands: Table<Brand>,
    categories: Table<Category>,
    products: Table<Product>,
}

impl Tables {
    fn listing(&self, product: &Product) -> StoreResult<ProductListing> {
        let brand = self.brands.get(&product.brand_id).ok_or_else(|| {
            StoreError::Backend(format!("product {} references unknown brand", product.id))
        })?;
        let category = self.categories.get(&product.category_id).ok_or_else(|| {
            StoreError::Backend(format!("product {} references unknown category", product.id))
        })?;

        Ok(ProductListing {
            product_id: product.id,
            brand_id: brand.id,
            brand_name: brand.name.clone(),
            category_id: category.id,
            category_name: category.name.clone(),
            price: product.price,
        })
    }

    fn listings_in_category(&self, category_id: CategoryId) -> StoreResult<Vec<ProductListing>> {
        self.products
            .rows
            .iter()
            .filter(|p| p.category_id == category_id)
            .map(|p| self.listing(p))
            .collect()
    }
}

/// Price ties are broken by brand name so results do not depend on
/// insertion order.
fn by_brand_name(a: &ProductListing, b: &ProductListing) -> Ordering {
    a.brand_name.cmp(&b.brand_name)
}

/// In-memory catalog store for tests/dev.
///
/// Every constraint is checked under the write lock, so the store itself is
/// the authoritative guard against duplicates from concurrent requests.
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    inner: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Tables>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Tables>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        Ok(self.read()?.brands.all())
    }

    async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>> {
        Ok(self.read()?.brands.get(&id).cloned())
    }

    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        Ok(self.read()?.brands.find(|b| b.name == name).cloned())
    }

    async fn insert_brand(&self, brand: Brand) -> StoreResult<Brand> {
        let mut tables = self.write()?;
        if tables.brands.find(|b| b.name == brand.name).is_some() {
            return Err(StoreError::duplicate("brand", brand.name));
        }
        if tables.brands.get(&brand.id).is_some() {
            return Err(StoreError::duplicate("brand", brand.id.to_string()));
        }
        tables.brands.push(brand.clone());
        Ok(brand)
    }

    async fn update_brand(&self, brand: Brand) -> StoreResult<Brand> {
        let mut tables = self.write()?;
        if tables
            .brands
            .find(|b| b.name == brand.name && b.id != brand.id)
            .is_some()
        {
            return Err(StoreError::duplicate("brand", brand.name));
        }
        if !tables.brands.replace(brand.clone()) {
            return Err(StoreError::missing("brand", brand.id.to_string()));
        }
        Ok(brand)
    }

    async fn delete_brand(&self, id: BrandId) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if !tables.brands.remove(&id) {
            return Ok(false);
        }
        tables.products.rows.retain(|p| p.brand_id != id);
        Ok(true)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.read()?.categories.all())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        Ok(self.read()?.categories.find(|c| c.name == name).cloned())
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        let mut tables = self.write()?;
        if tables.categories.find(|c| c.name == category.name).is_some() {
            return Err(StoreError::duplicate("category", category.name));
        }
        if tables.categories.get(&category.id).is_some() {
            return Err(StoreError::duplicate("category", category.id.to_string()));
        }
        tables.categories.push(category.clone());
        Ok(category)
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let mut tables = self.write()?;
        if tables.brands.get(&product.brand_id).is_none() {
            return Err(StoreError::missing("brand", product.brand_id.to_string()));
        }
        if tables.categories.get(&product.category_id).is_none() {
            return Err(StoreError::missing("category", product.category_id.to_string()));
        }
        if tables
            .products
            .find(|p| p.brand_id == product.brand_id && p.category_id == product.category_id)
            .is_some()
        {
            return Err(StoreError::duplicate(
                "product",
                format!("{}/{}", product.brand_id, product.category_id),
            ));
        }
        if tables.products.get(&product.id).is_some() {
            return Err(StoreError::duplicate("product", product.id.to_string()));
        }
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn cheapest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        let listings = self.read()?.listings_in_category(category_id)?;
        Ok(listings
            .into_iter()
            .min_by(|a, b| a.price.cmp(&b.price).then_with(|| by_brand_name(a, b))))
    }

    async fn priciest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        let listings = self.read()?.listings_in_category(category_id)?;
        Ok(listings
            .into_iter()
            .min_by(|a, b| b.price.cmp(&a.price).then_with(|| by_brand_name(a, b))))
    }

    async fn products_of_brand(&self, brand_id: BrandId) -> StoreResult<Vec<ProductListing>> {
        let tables = self.read()?;
        tables
            .products
            .rows
            .iter()
            .filter(|p| p.brand_id == brand_id)
            .map(|p| tables.listing(p))
            .collect()
    }
}
