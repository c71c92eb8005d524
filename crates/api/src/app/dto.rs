use serde::{Deserialize, Serialize};

use pricelens_catalog::{
    Brand, BrandPrice, CategoryLowest, CategoryPrice, CategoryPriceRange, LowestPricePerCategory,
    LowestTotalBrand,
};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct BrandRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRangeQuery {
    pub category: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct CategoryLowestResponse {
    #[serde(rename = "카테고리")]
    pub category: String,
    #[serde(rename = "브랜드")]
    pub brand: String,
    #[serde(rename = "가격")]
    pub price: u64,
}

#[derive(Debug, Serialize)]
pub struct LowestPricePerCategoryResponse {
    #[serde(rename = "카테고리별 최저가격")]
    pub items: Vec<CategoryLowestResponse>,
    #[serde(rename = "총액")]
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoryPriceResponse {
    #[serde(rename = "카테고리")]
    pub category: String,
    #[serde(rename = "가격")]
    pub price: u64,
}

#[derive(Debug, Serialize)]
pub struct LowestTotalBrandBody {
    #[serde(rename = "브랜드")]
    pub brand: String,
    #[serde(rename = "카테고리")]
    pub categories: Vec<CategoryPriceResponse>,
    #[serde(rename = "총액")]
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct LowestTotalBrandResponse {
    #[serde(rename = "최저가")]
    pub lowest: LowestTotalBrandBody,
}

#[derive(Debug, Serialize)]
pub struct BrandPriceResponse {
    #[serde(rename = "브랜드")]
    pub brand: String,
    #[serde(rename = "가격")]
    pub price: u64,
}

#[derive(Debug, Serialize)]
pub struct CategoryPriceRangeResponse {
    #[serde(rename = "카테고리")]
    pub category: String,
    #[serde(rename = "최저가")]
    pub lowest: BrandPriceResponse,
    #[serde(rename = "최고가")]
    pub highest: BrandPriceResponse,
}

#[derive(Debug, Serialize)]
pub struct BrandResponse {
    pub id: String,
    pub name: String,
}

// -------------------------
// Mapping
// -------------------------

impl From<CategoryLowest> for CategoryLowestResponse {
    fn from(value: CategoryLowest) -> Self {
        Self {
            category: value.category,
            brand: value.brand,
            price: value.price,
        }
    }
}

impl From<LowestPricePerCategory> for LowestPricePerCategoryResponse {
    fn from(value: LowestPricePerCategory) -> Self {
        Self {
            items: value.items.into_iter().map(Into::into).collect(),
            total: value.total,
        }
    }
}

impl From<CategoryPrice> for CategoryPriceResponse {
    fn from(value: CategoryPrice) -> Self {
        Self {
            category: value.category,
            price: value.price,
        }
    }
}

impl From<LowestTotalBrand> for LowestTotalBrandResponse {
    fn from(value: LowestTotalBrand) -> Self {
        Self {
            lowest: LowestTotalBrandBody {
                brand: value.brand,
                categories: value.categories.into_iter().map(Into::into).collect(),
                total: value.total,
            },
        }
    }
}

impl From<BrandPrice> for BrandPriceResponse {
    fn from(value: BrandPrice) -> Self {
        Self {
            brand: value.brand,
            price: value.price,
        }
    }
}

impl From<CategoryPriceRange> for CategoryPriceRangeResponse {
    fn from(value: CategoryPriceRange) -> Self {
        Self {
            category: value.category,
            lowest: value.lowest.into(),
            highest: value.highest.into(),
        }
    }
}

impl From<Brand> for BrandResponse {
    fn from(value: Brand) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}
