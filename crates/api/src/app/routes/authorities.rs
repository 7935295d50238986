use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use brewhouse_auth::Authority;

use crate::app::errors;
use crate::app::routes::common::{self, ListParams};
use crate::app::services::AppServices;

const ENTITY_NAME: &str = "authority";

/// Authorities are keyed by their caller-supplied name, which is also the
/// only field; the surface is create/list/get/delete with nothing to update.
pub fn router() -> Router {
    Router::new()
        .route("/", post(create_authority).get(list_authorities))
        .route("/:name", get(get_authority).delete(delete_authority))
}

pub async fn create_authority(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Authority>,
) -> axum::response::Response {
    tracing::debug!(?body, "rest request to create authority");
    if body.name.trim().is_empty() {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_NULL, "invalid name");
    }
    // The name is the identity, so "already has an id" means "already exists".
    match services.authorities_exists(&body.name).await {
        Ok(false) => {}
        Ok(true) => {
            return errors::bad_request_alert(
                ENTITY_NAME,
                errors::ID_EXISTS,
                "authority already exists",
            );
        }
        Err(err) => return errors::service_error_to_response(err),
    }

    match services.authorities_save(body).await {
        Ok(saved) => common::created("authorities", &saved),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn list_authorities(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    tracing::debug!("rest request to get all authorities");
    match services.authorities_find_all(params.sort().as_ref()).await {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn get_authority(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    tracing::debug!(%name, "rest request to get authority");
    match services.authorities_find_one(&name).await {
        Ok(Some(authority)) => (StatusCode::OK, Json(authority)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "authority not found"),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn delete_authority(
    Extension(services): Extension<Arc<AppServices>>,
    Path(name): Path<String>,
) -> axum::response::Response {
    tracing::debug!(%name, "rest request to delete authority");
    match services.authorities_delete(&name).await {
        Ok(()) => common::deleted(ENTITY_NAME, &name),
        Err(err) => errors::service_error_to_response(err),
    }
}
