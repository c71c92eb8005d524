//! Catalog entities: brands, categories and the products tying them together.

use pricelens_core::{BrandId, CategoryId, DomainError, DomainResult, Entity, ProductId};

/// Longest brand/category name the catalog accepts (matches the storage column).
pub const MAX_NAME_LEN: usize = 100;

/// A named seller/manufacturer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

impl Brand {
    /// A brand that has not been persisted yet, with a freshly assigned id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: BrandId::new(),
            name: name.into(),
        }
    }

    /// Same identity, new name.
    pub fn renamed(self, name: impl Into<String>) -> Self {
        Self {
            id: self.id,
            name: name.into(),
        }
    }
}

impl Entity for Brand {
    type Id = BrandId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A named grouping of products ("상의", "바지", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// One brand's priced offer in one category.
///
/// At most one product exists per (brand, category) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub brand_id: BrandId,
    pub category_id: CategoryId,
    pub price: u64,
}

impl Product {
    pub fn new(brand_id: BrandId, category_id: CategoryId, price: u64) -> Self {
        Self {
            id: ProductId::new(),
            brand_id,
            category_id,
            price,
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A product joined with the names of its brand and category.
///
/// Every pricing capability of the store returns listings so results can be
/// reported without further lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    pub product_id: ProductId,
    pub brand_id: BrandId,
    pub brand_name: String,
    pub category_id: CategoryId,
    pub category_name: String,
    pub price: u64,
}

/// Trim a caller-supplied name and check it is storable.
///
/// Applied by the brand lifecycle operations before any store access.
pub fn normalize_name(raw: &str) -> DomainResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation("name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "name cannot be longer than {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}
