//! Catalog seeding.
//!
//! Products have no mutation path through the API, so a fresh store is filled
//! from a seed: either the built-in sample catalog or a JSON file with the
//! same shape.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use pricelens_catalog::{Brand, CatalogStore, Category, Product, StoreError};
use pricelens_core::{BrandId, CategoryId};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("seed product references unknown {entity}: {name}")]
    UnknownReference { entity: &'static str, name: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedProduct {
    pub brand: String,
    pub category: String,
    pub price: u64,
}

/// Catalog contents to load into a store.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub brands: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub products: Vec<SeedProduct>,
}

/// What a seed run actually inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub brands: usize,
    pub categories: usize,
    pub products: usize,
}

const BUILTIN_CATEGORIES: [&str; 8] = [
    "상의", "아우터", "바지", "스니커즈", "가방", "모자", "양말", "액세서리",
];

/// Prices per brand, in `BUILTIN_CATEGORIES` order.
const BUILTIN_PRICES: [(&str, [u64; 8]); 9] = [
    ("A", [11200, 5500, 4200, 9000, 2000, 1700, 1800, 2300]),
    ("B", [10500, 5900, 3800, 9100, 2100, 2000, 2000, 2200]),
    ("C", [10000, 6200, 3300, 9200, 2200, 1900, 2200, 2100]),
    ("D", [10100, 5100, 3000, 9500, 2500, 1500, 2400, 2000]),
    ("E", [10700, 5000, 3800, 9900, 2300, 1800, 2100, 2100]),
    ("F", [11200, 7200, 4000, 9300, 2100, 1600, 2300, 1900]),
    ("G", [10500, 5800, 3900, 9000, 2200, 1700, 2100, 2000]),
    ("H", [10800, 6300, 3100, 9700, 2100, 1600, 2000, 2000]),
    ("I", [11400, 6700, 3200, 9500, 2400, 1700, 1700, 2400]),
];

impl CatalogSeed {
    /// Sample catalog: brands A–I, eight clothing categories, one product per pair.
    pub fn builtin() -> Self {
        let categories: Vec<String> = BUILTIN_CATEGORIES.iter().map(|c| c.to_string()).collect();
        let brands: Vec<String> = BUILTIN_PRICES.iter().map(|(b, _)| b.to_string()).collect();
        let products = BUILTIN_PRICES
            .iter()
            .flat_map(|(brand, prices)| {
                BUILTIN_CATEGORIES
                    .iter()
                    .zip(prices.iter())
                    .map(|(category, price)| SeedProduct {
                        brand: brand.to_string(),
                        category: category.to_string(),
                        price: *price,
                    })
            })
            .collect();

        Self {
            brands,
            categories,
            products,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load the seed into `store`.
    ///
    /// Rows that already exist (brands/categories by name, products by
    /// brand + category) are left untouched, so applying the same seed twice
    /// inserts nothing the second time.
    #[instrument(skip_all, err)]
    pub async fn apply<S>(&self, store: &S) -> Result<SeedReport, SeedError>
    where
        S: CatalogStore + ?Sized,
    {
        let mut report = SeedReport::default();

        for name in &self.brands {
            if store.find_brand_by_name(name).await?.is_none() {
                store.insert_brand(Brand::new(name.as_str())).await?;
                report.brands += 1;
            }
        }

        for name in &self.categories {
            if store.find_category_by_name(name).await?.is_none() {
                store.insert_category(Category::new(name.as_str())).await?;
                report.categories += 1;
            }
        }

        let brands: HashMap<String, BrandId> = store
            .list_brands()
            .await?
            .into_iter()
            .map(|b| (b.name, b.id))
            .collect();
        let categories: HashMap<String, CategoryId> = store
            .list_categories()
            .await?
            .into_iter()
            .map(|c| (c.name, c.id))
            .collect();

        let mut priced: HashMap<BrandId, Vec<CategoryId>> = HashMap::new();
        for product in &self.products {
            let brand_id = *brands.get(&product.brand).ok_or_else(|| SeedError::UnknownReference {
                entity: "brand",
                name: product.brand.clone(),
            })?;
            let category_id =
                *categories
                    .get(&product.category)
                    .ok_or_else(|| SeedError::UnknownReference {
                        entity: "category",
                        name: product.category.clone(),
                    })?;

            if !priced.contains_key(&brand_id) {
                let existing = store
                    .products_of_brand(brand_id)
                    .await?
                    .into_iter()
                    .map(|l| l.category_id)
                    .collect();
                priced.insert(brand_id, existing);
            }
            let taken = priced.entry(brand_id).or_default();
            if taken.contains(&category_id) {
                continue;
            }

            store
                .insert_product(Product::new(brand_id, category_id, product.price))
                .await?;
            taken.push(category_id);
            report.products += 1;
        }

        info!(
            brands = report.brands,
            categories = report.categories,
            products = report.products,
            "catalog seeded"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_covers_every_pair_once() {
        let seed = CatalogSeed::builtin();
        assert_eq!(seed.brands.len(), 9);
        assert_eq!(seed.categories.len(), 8);
        assert_eq!(seed.products.len(), 72);

        let d_total: u64 = seed
            .products
            .iter()
            .filter(|p| p.brand == "D")
            .map(|p| p.price)
            .sum();
        assert_eq!(d_total, 36100);
    }

    #[test]
    fn parses_json_seed() {
        let seed = CatalogSeed::from_json(
            r#"{
                "brands": ["A"],
                "categories": ["상의"],
                "products": [{"brand": "A", "category": "상의", "price": 10000}]
            }"#,
        )
        .unwrap();

        assert_eq!(seed.brands, vec!["A"]);
        assert_eq!(
            seed.products,
            vec![SeedProduct { brand: "A".into(), category: "상의".into(), price: 10000 }]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed = CatalogSeed::from_json(r#"{"categories": ["양말"]}"#).unwrap();
        assert!(seed.brands.is_empty());
        assert!(seed.products.is_empty());
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = CatalogSeed::from_json(
            r#"{"products": [{"brand": "A", "category": "상의", "price": -1}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CatalogSeed::from_path(Path::new("/nonexistent/seed.json")).unwrap_err();
        match err {
            SeedError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/seed.json")),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
