use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, OriginalUri, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use pricelens_core::BrandId;

use crate::app::dto;
use crate::app::errors;
use crate::app::services::AppServices;

fn parse_brand_id(raw: &str, path: &str) -> Result<BrandId, axum::response::Response> {
    raw.parse::<BrandId>().map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", e.to_string(), path)
    })
}

fn read_body(
    body: Result<Json<dto::BrandRequest>, JsonRejection>,
    path: &str,
) -> Result<dto::BrandRequest, axum::response::Response> {
    body.map(|Json(b)| b).map_err(|e| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", e.body_text(), path)
    })
}

pub async fn create_brand(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<dto::BrandRequest>, JsonRejection>,
) -> axum::response::Response {
    let body = match read_body(body, uri.path()) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match pricelens_catalog::create_brand(services.store(), &body.name).await {
        Ok(brand) => (StatusCode::CREATED, Json(dto::BrandResponse::from(brand))).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}

pub async fn update_brand(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
    body: Result<Json<dto::BrandRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match parse_brand_id(&id, uri.path()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match read_body(body, uri.path()) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match pricelens_catalog::update_brand(services.store(), id, &body.name).await {
        Ok(brand) => Json(dto::BrandResponse::from(brand)).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}

pub async fn delete_brand(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_brand_id(&id, uri.path()) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match pricelens_catalog::delete_brand(services.store(), id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}
