//! Postgres-backed catalog store.
//!
//! ## Error Mapping
//!
//! | PostgreSQL Error Code | StoreError | Scenario |
//! |----------------------|------------|----------|
//! | `23505` (unique violation) | `Duplicate` | Brand/category name taken, second product for a (brand, category) pair |
//! | `23503` (foreign key violation) | `MissingReference` | Product points at a brand/category that does not exist |
//! | Any other / non-database errors | `Backend` | Connection failures, pool closed, bad row data |
//!
//! ## Ordering
//!
//! Ids are UUIDv7, so `ORDER BY id` enumerates rows in creation order. Price
//! ties in the extreme queries are broken by brand name under the `"C"`
//! collation, which matches byte-wise string ordering.

use std::sync::Arc;

use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use pricelens_catalog::{
    Brand, CatalogStore, Category, Product, ProductListing, StoreError, StoreResult,
};
use pricelens_core::{BrandId, CategoryId, ProductId};

/// Schema applied by [`PostgresCatalogStore::migrate`]. Idempotent.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS brands (
    id   UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS categories (
    id   UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS products (
    id          UUID PRIMARY KEY,
    brand_id    UUID NOT NULL REFERENCES brands (id) ON DELETE CASCADE,
    category_id UUID NOT NULL REFERENCES categories (id),
    price       BIGINT NOT NULL CHECK (price >= 0),
    UNIQUE (brand_id, category_id)
);

CREATE INDEX IF NOT EXISTS products_category_price_idx ON products (category_id, price);
"#;

const LISTING_SELECT: &str = r#"
SELECT
    p.id AS product_id,
    b.id AS brand_id,
    b.name AS brand_name,
    c.id AS category_id,
    c.name AS category_name,
    p.price AS price
FROM products p
JOIN brands b ON b.id = p.brand_id
JOIN categories c ON c.id = p.category_id
"#;

/// Postgres-backed catalog store.
///
/// Uses the SQLx connection pool, so it is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: Arc<PgPool>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Create the catalog tables if they do not exist yet.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", "schema", String::new(), e))?;
        Ok(())
    }

    async fn one_listing(
        &self,
        operation: &str,
        order_by: &str,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.category_id = $1 ORDER BY {order_by} LIMIT 1");
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(category_id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, "category", category_id.to_string(), e))?;

        row.map(ProductListing::try_from).transpose()
    }
}

#[async_trait::async_trait]
impl CatalogStore for PostgresCatalogStore {
    #[instrument(skip(self), err)]
    async fn list_brands(&self) -> StoreResult<Vec<Brand>> {
        let rows = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM brands ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_brands", "brand", String::new(), e))?;
        Ok(rows.into_iter().map(NamedRow::into_brand).collect())
    }

    #[instrument(skip(self), fields(brand_id = %id), err)]
    async fn find_brand(&self, id: BrandId) -> StoreResult<Option<Brand>> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM brands WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_brand", "brand", id.to_string(), e))?;
        Ok(row.map(NamedRow::into_brand))
    }

    #[instrument(skip(self), err)]
    async fn find_brand_by_name(&self, name: &str) -> StoreResult<Option<Brand>> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM brands WHERE name = $1")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_brand_by_name", "brand", name.to_string(), e))?;
        Ok(row.map(NamedRow::into_brand))
    }

    #[instrument(skip(self), fields(brand_id = %brand.id), err)]
    async fn insert_brand(&self, brand: Brand) -> StoreResult<Brand> {
        sqlx::query("INSERT INTO brands (id, name) VALUES ($1, $2)")
            .bind(brand.id.as_uuid())
            .bind(&brand.name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_brand", "brand", brand.name.clone(), e))?;
        Ok(brand)
    }

    #[instrument(skip(self), fields(brand_id = %brand.id), err)]
    async fn update_brand(&self, brand: Brand) -> StoreResult<Brand> {
        let result = sqlx::query("UPDATE brands SET name = $2 WHERE id = $1")
            .bind(brand.id.as_uuid())
            .bind(&brand.name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_brand", "brand", brand.name.clone(), e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::missing("brand", brand.id.to_string()));
        }
        Ok(brand)
    }

    #[instrument(skip(self), fields(brand_id = %id), err)]
    async fn delete_brand(&self, id: BrandId) -> StoreResult<bool> {
        // Owned products go with it (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_brand", "brand", id.to_string(), e))?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_categories", "category", String::new(), e))?;
        Ok(rows.into_iter().map(NamedRow::into_category).collect())
    }

    #[instrument(skip(self), err)]
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| {
                map_sqlx_error("find_category_by_name", "category", name.to_string(), e)
            })?;
        Ok(row.map(NamedRow::into_category))
    }

    #[instrument(skip(self), fields(category_id = %category.id), err)]
    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2)")
            .bind(category.id.as_uuid())
            .bind(&category.name)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_category", "category", category.name.clone(), e))?;
        Ok(category)
    }

    #[instrument(skip(self), fields(product_id = %product.id), err)]
    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        let price = i64::try_from(product.price)
            .map_err(|_| StoreError::Backend(format!("price out of range: {}", product.price)))?;
        let key = format!("{}/{}", product.brand_id, product.category_id);

        sqlx::query("INSERT INTO products (id, brand_id, category_id, price) VALUES ($1, $2, $3, $4)")
            .bind(product.id.as_uuid())
            .bind(product.brand_id.as_uuid())
            .bind(product.category_id.as_uuid())
            .bind(price)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_product", "product", key, e))?;
        Ok(product)
    }

    #[instrument(skip(self), fields(category_id = %category_id), err)]
    async fn cheapest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        self.one_listing(
            "cheapest_in_category",
            r#"p.price ASC, b.name COLLATE "C" ASC"#,
            category_id,
        )
        .await
    }

    #[instrument(skip(self), fields(category_id = %category_id), err)]
    async fn priciest_in_category(
        &self,
        category_id: CategoryId,
    ) -> StoreResult<Option<ProductListing>> {
        self.one_listing(
            "priciest_in_category",
            r#"p.price DESC, b.name COLLATE "C" ASC"#,
            category_id,
        )
        .await
    }

    #[instrument(skip(self), fields(brand_id = %brand_id), err)]
    async fn products_of_brand(&self, brand_id: BrandId) -> StoreResult<Vec<ProductListing>> {
        let sql = format!("{LISTING_SELECT} WHERE p.brand_id = $1 ORDER BY p.id");
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(brand_id.as_uuid())
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("products_of_brand", "brand", brand_id.to_string(), e))?;

        rows.into_iter().map(ProductListing::try_from).collect()
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, entity: &'static str, key: String, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => StoreError::Duplicate { entity, key },
            Some("23503") => StoreError::MissingReference { entity, key },
            _ => StoreError::Backend(format!(
                "database error in {}: {}",
                operation,
                db_err.message()
            )),
        },
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed during {}", operation))
        }
        other => StoreError::Backend(format!("{} failed: {}", operation, other)),
    }
}

// SQLx row types

#[derive(Debug)]
struct NamedRow {
    id: Uuid,
    name: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for NamedRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(NamedRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
        })
    }
}

impl NamedRow {
    fn into_brand(self) -> Brand {
        Brand {
            id: BrandId::from_uuid(self.id),
            name: self.name,
        }
    }

    fn into_category(self) -> Category {
        Category {
            id: CategoryId::from_uuid(self.id),
            name: self.name,
        }
    }
}

#[derive(Debug)]
struct ListingRow {
    product_id: Uuid,
    brand_id: Uuid,
    brand_name: String,
    category_id: Uuid,
    category_name: String,
    price: i64,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ListingRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(ListingRow {
            product_id: row.try_get("product_id")?,
            brand_id: row.try_get("brand_id")?,
            brand_name: row.try_get("brand_name")?,
            category_id: row.try_get("category_id")?,
            category_name: row.try_get("category_name")?,
            price: row.try_get("price")?,
        })
    }
}

impl TryFrom<ListingRow> for ProductListing {
    type Error = StoreError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let price = u64::try_from(row.price).map_err(|_| {
            StoreError::Backend(format!("negative price stored for product {}", row.product_id))
        })?;

        Ok(ProductListing {
            product_id: ProductId::from_uuid(row.product_id),
            brand_id: BrandId::from_uuid(row.brand_id),
            brand_name: row.brand_name,
            category_id: CategoryId::from_uuid(row.category_id),
            category_name: row.category_name,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: i64) -> ListingRow {
        ListingRow {
            product_id: Uuid::now_v7(),
            brand_id: Uuid::now_v7(),
            brand_name: "A".into(),
            category_id: Uuid::now_v7(),
            category_name: "상의".into(),
            price,
        }
    }

    #[test]
    fn listing_row_converts() {
        let listing = ProductListing::try_from(row(10000)).unwrap();
        assert_eq!(listing.brand_name, "A");
        assert_eq!(listing.category_name, "상의");
        assert_eq!(listing.price, 10000);
    }

    #[test]
    fn row_types_decode_from_postgres_rows() {
        fn decodable<T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>>() {}

        decodable::<NamedRow>();
        decodable::<ListingRow>();
    }

    #[test]
    fn negative_price_is_a_backend_error() {
        let err = ProductListing::try_from(row(-1)).unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
    }

    #[test]
    fn pool_closed_is_a_backend_error() {
        let err = map_sqlx_error("list_brands", "brand", String::new(), sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            StoreError::Backend("connection pool closed during list_brands".into())
        );
    }

    #[test]
    fn schema_declares_the_catalog_constraints() {
        assert!(SCHEMA.contains("name VARCHAR(100) NOT NULL UNIQUE"));
        assert!(SCHEMA.contains("ON DELETE CASCADE"));
        assert!(SCHEMA.contains("UNIQUE (brand_id, category_id)"));
    }
}
