use axum::{
    routing::{get, post, put},
    Router,
};

pub mod brands;
pub mod categories;
pub mod pricing;
pub mod system;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .route("/lowest-price-brands", get(pricing::lowest_price_brands))
        .route("/lowest-price-brand", get(pricing::lowest_price_brand))
        .route("/category-price-range", get(pricing::category_price_range))
        .route("/categories", get(categories::list_categories))
        .route("/brand", post(brands::create_brand))
        .route(
            "/brand/:id",
            put(brands::update_brand).delete(brands::delete_brand),
        )
}
