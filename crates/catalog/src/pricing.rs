//! Pricing aggregations over the catalog.
//!
//! Each query reads the current store contents and computes its answer from
//! scratch; nothing is cached between calls.

use tracing::{debug, instrument};

use pricelens_core::DomainError;

use crate::error::{CatalogError, CatalogResult};
use crate::model::ProductListing;
use crate::store::CatalogStore;

/// Cheapest offer found in one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLowest {
    pub category: String,
    pub brand: String,
    pub price: u64,
}

/// Cheapest offer per category plus what buying all of them costs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowestPricePerCategory {
    pub items: Vec<CategoryLowest>,
    pub total: u64,
}

impl LowestPricePerCategory {
    /// Build the summary from one cheapest listing per category, in category
    /// order. Returns `None` when there is nothing to summarize.
    pub fn from_listings(
        listings: impl IntoIterator<Item = ProductListing>,
    ) -> CatalogResult<Option<Self>> {
        let items: Vec<CategoryLowest> = listings
            .into_iter()
            .map(|l| CategoryLowest {
                category: l.category_name,
                brand: l.brand_name,
                price: l.price,
            })
            .collect();

        if items.is_empty() {
            return Ok(None);
        }

        let total = checked_total(items.iter().map(|i| i.price))?;
        Ok(Some(Self { items, total }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPrice {
    pub category: String,
    pub price: u64,
}

/// The brand whose whole range is cheapest to buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowestTotalBrand {
    pub brand: String,
    pub categories: Vec<CategoryPrice>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandPrice {
    pub brand: String,
    pub price: u64,
}

impl From<ProductListing> for BrandPrice {
    fn from(value: ProductListing) -> Self {
        Self {
            brand: value.brand_name,
            price: value.price,
        }
    }
}

/// Lowest and highest offers within one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPriceRange {
    pub category: String,
    pub lowest: BrandPrice,
    pub highest: BrandPrice,
}

/// Sum prices, failing instead of wrapping when the total leaves `u64`.
pub fn checked_total(prices: impl IntoIterator<Item = u64>) -> CatalogResult<u64> {
    prices
        .into_iter()
        .try_fold(0u64, |acc, price| acc.checked_add(price))
        .ok_or(CatalogError::TotalOverflow)
}

/// Pick the candidate with the smallest summed price.
///
/// Candidates are scanned in order and only a strictly smaller total replaces
/// the current winner, so the first of several tied candidates wins. A
/// candidate without listings totals 0.
pub fn select_lowest_total<B>(
    candidates: impl IntoIterator<Item = (B, Vec<ProductListing>)>,
) -> CatalogResult<Option<(B, Vec<ProductListing>, u64)>> {
    let mut best: Option<(B, Vec<ProductListing>, u64)> = None;

    for (candidate, listings) in candidates {
        let total = checked_total(listings.iter().map(|l| l.price))?;
        let replace = match &best {
            None => true,
            Some((_, _, best_total)) => total < *best_total,
        };
        if replace {
            best = Some((candidate, listings, total));
        }
    }

    Ok(best)
}

/// Cheapest product of every category and the sum of those prices.
///
/// Categories without products are skipped. Fails with `NotFound` when there
/// are no categories or none of them has a product.
#[instrument(skip(store), err)]
pub async fn lowest_price_per_category<S>(store: &S) -> CatalogResult<LowestPricePerCategory>
where
    S: CatalogStore + ?Sized,
{
    let categories = store.list_categories().await?;
    if categories.is_empty() {
        return Err(DomainError::not_found("no categories in catalog").into());
    }

    let mut cheapest = Vec::with_capacity(categories.len());
    for category in &categories {
        if let Some(listing) = store.cheapest_in_category(category.id).await? {
            cheapest.push(listing);
        }
    }

    debug!(
        categories = categories.len(),
        priced = cheapest.len(),
        "collected cheapest listing per category"
    );

    LowestPricePerCategory::from_listings(cheapest)?
        .ok_or_else(|| DomainError::not_found("no products in any category").into())
}

/// The single brand whose products sum to the lowest total.
///
/// Ties go to the brand enumerated first. A brand with no products totals 0
/// and therefore wins unless an earlier brand also totals 0.
#[instrument(skip(store), err)]
pub async fn lowest_total_brand<S>(store: &S) -> CatalogResult<LowestTotalBrand>
where
    S: CatalogStore + ?Sized,
{
    let brands = store.list_brands().await?;
    if brands.is_empty() {
        return Err(DomainError::not_found("no brands in catalog").into());
    }

    let mut candidates = Vec::with_capacity(brands.len());
    for brand in brands {
        let listings = store.products_of_brand(brand.id).await?;
        candidates.push((brand, listings));
    }

    let (brand, listings, total) = select_lowest_total(candidates)?
        .ok_or_else(|| DomainError::not_found("no brand could be selected"))?;

    debug!(brand = %brand.name, products = listings.len(), total, "selected lowest total brand");

    Ok(LowestTotalBrand {
        brand: brand.name,
        categories: listings
            .into_iter()
            .map(|l| CategoryPrice {
                category: l.category_name,
                price: l.price,
            })
            .collect(),
        total,
    })
}

/// Lowest and highest priced offers in the named category.
///
/// The two extremes come from independent store queries. A category with a
/// single product reports it as both.
#[instrument(skip(store), err)]
pub async fn category_price_range<S>(store: &S, category_name: &str) -> CatalogResult<CategoryPriceRange>
where
    S: CatalogStore + ?Sized,
{
    let category = store
        .find_category_by_name(category_name)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("category not found: {category_name}")))?;

    let lowest = store.cheapest_in_category(category.id).await?;
    let highest = store.priciest_in_category(category.id).await?;

    match (lowest, highest) {
        (Some(lowest), Some(highest)) => Ok(CategoryPriceRange {
            category: category.name,
            lowest: lowest.into(),
            highest: highest.into(),
        }),
        _ => Err(DomainError::not_found(format!(
            "no products in category: {category_name}"
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricelens_core::{BrandId, CategoryId, ProductId};

    fn listing(brand: &str, category: &str, price: u64) -> ProductListing {
        ProductListing {
            product_id: ProductId::new(),
            brand_id: BrandId::new(),
            brand_name: brand.to_string(),
            category_id: CategoryId::new(),
            category_name: category.to_string(),
            price,
        }
    }

    #[test]
    fn from_listings_keeps_order_and_sums() {
        let summary = LowestPricePerCategory::from_listings(vec![
            listing("A", "상의", 10000),
            listing("A", "하의", 20000),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(
            summary.items,
            vec![
                CategoryLowest { category: "상의".into(), brand: "A".into(), price: 10000 },
                CategoryLowest { category: "하의".into(), brand: "A".into(), price: 20000 },
            ]
        );
        assert_eq!(summary.total, 30000);
    }

    #[test]
    fn from_listings_is_none_when_empty() {
        assert!(LowestPricePerCategory::from_listings(Vec::new()).unwrap().is_none());
    }

    #[test]
    fn select_lowest_total_keeps_first_of_tied_candidates() {
        let picked = select_lowest_total(vec![
            ("A", vec![listing("A", "상의", 100), listing("A", "하의", 200)]),
            ("B", vec![listing("B", "상의", 150), listing("B", "하의", 150)]),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(picked.0, "A");
        assert_eq!(picked.2, 300);
    }

    #[test]
    fn select_lowest_total_lets_empty_brand_win() {
        let picked = select_lowest_total(vec![
            ("A", vec![listing("A", "상의", 100)]),
            ("Empty", vec![]),
        ])
        .unwrap()
        .unwrap();

        assert_eq!(picked.0, "Empty");
        assert!(picked.1.is_empty());
        assert_eq!(picked.2, 0);
    }

    #[test]
    fn select_lowest_total_of_nothing_is_none() {
        let picked = select_lowest_total(Vec::<(&str, Vec<ProductListing>)>::new()).unwrap();
        assert!(picked.is_none());
    }

    #[test]
    fn totals_past_u64_are_an_error() {
        let half = u64::MAX / 2 + 1;

        let err = LowestPricePerCategory::from_listings(vec![
            listing("A", "상의", half),
            listing("A", "하의", half),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::TotalOverflow);

        let err = select_lowest_total(vec![(
            "A",
            vec![listing("A", "상의", half), listing("A", "하의", half)],
        )])
        .unwrap_err();
        assert_eq!(err, CatalogError::TotalOverflow);
    }

    #[test]
    fn checked_total_reaches_u64_max_exactly() {
        assert_eq!(checked_total([u64::MAX - 1, 1]).unwrap(), u64::MAX);
        assert_eq!(checked_total([]).unwrap(), 0);
    }

    #[test]
    fn brand_price_from_listing() {
        let bp: BrandPrice = listing("B", "상의", 15000).into();
        assert_eq!(bp, BrandPrice { brand: "B".into(), price: 15000 });
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn totals_strategy() -> impl Strategy<Value = Vec<Vec<u64>>> {
            prop::collection::vec(prop::collection::vec(0u64..1_000_000, 0..8), 1..12)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: the reported total is exactly the sum of the reported prices.
            #[test]
            fn total_equals_sum_of_items(prices in prop::collection::vec(0u64..1_000_000, 1..20)) {
                let listings = prices
                    .iter()
                    .enumerate()
                    .map(|(i, p)| listing("brand", &format!("category-{i}"), *p));

                let summary = LowestPricePerCategory::from_listings(listings).unwrap().unwrap();
                prop_assert_eq!(summary.items.len(), prices.len());
                prop_assert_eq!(summary.total, summary.items.iter().map(|i| i.price).sum::<u64>());
            }

            /// Property: the winner's total is <= every candidate's, and it is the
            /// first candidate reaching that total.
            #[test]
            fn winner_is_first_minimum(totals in totals_strategy()) {
                let candidates: Vec<(usize, Vec<ProductListing>)> = totals
                    .iter()
                    .enumerate()
                    .map(|(idx, prices)| {
                        let listings = prices
                            .iter()
                            .map(|p| listing(&format!("brand-{idx}"), "category", *p))
                            .collect();
                        (idx, listings)
                    })
                    .collect();

                let sums: Vec<u64> = totals.iter().map(|p| p.iter().sum()).collect();
                let (winner, listings, total) = select_lowest_total(candidates).unwrap().unwrap();

                prop_assert!(sums.iter().all(|s| total <= *s));
                prop_assert_eq!(total, sums[winner]);
                prop_assert_eq!(listings.len(), totals[winner].len());
                let first_min = sums.iter().position(|s| *s == total).unwrap();
                prop_assert_eq!(winner, first_min);
            }
        }
    }
}
