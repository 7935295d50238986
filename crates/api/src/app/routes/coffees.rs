use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use brewhouse_catalog::{Coffee, CoffeePatch};

use crate::app::errors;
use crate::app::routes::common::{self, ListParams};
use crate::app::services::AppServices;

const ENTITY_NAME: &str = "coffee";

pub fn router() -> Router {
    // The collection URL takes only POST and GET; PUT/PATCH/DELETE there is
    // a routing-level 405.
    Router::new()
        .route("/", post(create_coffee).get(list_coffees))
        .route(
            "/:id",
            get(get_coffee)
                .put(update_coffee)
                .patch(partial_update_coffee)
                .delete(delete_coffee),
        )
}

pub async fn create_coffee(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Coffee>,
) -> axum::response::Response {
    tracing::debug!(?body, "rest request to create coffee");
    if body.id.is_some() {
        return errors::bad_request_alert(
            ENTITY_NAME,
            errors::ID_EXISTS,
            "a new coffee cannot already have an id",
        );
    }

    match services.coffees_save(body).await {
        Ok(saved) => common::created("coffees", &saved),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn update_coffee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<Coffee>,
) -> axum::response::Response {
    tracing::debug!(%id, ?body, "rest request to update coffee");
    let Some(body_id) = body.id else {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_NULL, "invalid id");
    };
    if body_id != id {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_INVALID, "invalid id");
    }
    match services.coffees_exists(&id).await {
        Ok(true) => {}
        Ok(false) => {
            return errors::bad_request_alert(ENTITY_NAME, errors::ID_NOT_FOUND, "entity not found");
        }
        Err(err) => return errors::service_error_to_response(err),
    }

    match services.coffees_save(body).await {
        Ok(saved) => common::updated(&saved),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn partial_update_coffee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<CoffeePatch>,
) -> axum::response::Response {
    tracing::debug!(%id, ?body, "rest request to partially update coffee");
    let Some(body_id) = body.id else {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_NULL, "invalid id");
    };
    if body_id != id {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_INVALID, "invalid id");
    }
    match services.coffees_exists(&id).await {
        Ok(true) => {}
        Ok(false) => {
            return errors::bad_request_alert(ENTITY_NAME, errors::ID_NOT_FOUND, "entity not found");
        }
        Err(err) => return errors::service_error_to_response(err),
    }

    match services.coffees_partial_update(body).await {
        Ok(Some(merged)) => common::updated(&merged),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "coffee not found"),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn list_coffees(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    tracing::debug!("rest request to get all coffees");
    match services.coffees_find_all(params.sort().as_ref()).await {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn get_coffee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    tracing::debug!(%id, "rest request to get coffee");
    match services.coffees_find_one(&id).await {
        Ok(Some(coffee)) => (StatusCode::OK, Json(coffee)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "coffee not found"),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn delete_coffee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    tracing::debug!(%id, "rest request to delete coffee");
    match services.coffees_delete(&id).await {
        Ok(()) => common::deleted(ENTITY_NAME, &id.to_string()),
        Err(err) => errors::service_error_to_response(err),
    }
}
