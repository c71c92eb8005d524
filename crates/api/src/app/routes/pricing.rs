use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn lowest_price_brands(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> axum::response::Response {
    match pricelens_catalog::lowest_price_per_category(services.store()).await {
        Ok(summary) => Json(dto::LowestPricePerCategoryResponse::from(summary)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}

pub async fn lowest_price_brand(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> axum::response::Response {
    match pricelens_catalog::lowest_total_brand(services.store()).await {
        Ok(winner) => Json(dto::LowestTotalBrandResponse::from(winner)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}

pub async fn category_price_range(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<dto::CategoryRangeQuery>,
) -> axum::response::Response {
    let Some(category) = query.category.filter(|c| !c.trim().is_empty()) else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_input",
            "query parameter 'category' is required",
            uri.path(),
        );
    };

    match pricelens_catalog::category_price_range(services.store(), category.trim()).await {
        Ok(range) => Json(dto::CategoryPriceRangeResponse::from(range)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}
