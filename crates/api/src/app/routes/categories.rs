use std::sync::Arc;

use axum::{
    extract::{Extension, OriginalUri},
    response::IntoResponse,
    Json,
};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    OriginalUri(uri): OriginalUri,
) -> axum::response::Response {
    match pricelens_catalog::list_categories(services.store()).await {
        Ok(names) => Json(names).into_response(),
        Err(e) => errors::catalog_error_to_response(e, uri.path()),
    }
}
