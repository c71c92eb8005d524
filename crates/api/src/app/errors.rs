use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;

use pricelens_catalog::CatalogError;
use pricelens_core::DomainError;

pub fn catalog_error_to_response(err: CatalogError, path: &str) -> axum::response::Response {
    match err {
        CatalogError::Domain(DomainError::NotFound(msg)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", msg, path)
        }
        CatalogError::Domain(DomainError::Conflict(msg)) => {
            json_error(StatusCode::CONFLICT, "conflict", msg, path)
        }
        CatalogError::Domain(DomainError::Validation(msg) | DomainError::InvalidId(msg)) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg, path)
        }
        CatalogError::Unavailable(msg) => {
            tracing::error!(error = %msg, path, "catalog store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg, path)
        }
        err @ CatalogError::TotalOverflow => {
            tracing::error!(path, "price total overflow");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "price_overflow",
                err.to_string(),
                path,
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    path: &str,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": status.as_u16(),
            "error": code,
            "message": message.into(),
            "path": path,
        })),
    )
        .into_response()
}
