use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use brewhouse_customers::{Customer, CustomerPatch};

use crate::app::errors;
use crate::app::routes::common::{self, ListParams};
use crate::app::services::AppServices;

const ENTITY_NAME: &str = "customer";

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route(
            "/:id",
            get(get_customer)
                .put(update_customer)
                .patch(partial_update_customer)
                .delete(delete_customer),
        )
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<Customer>,
) -> axum::response::Response {
    tracing::debug!(?body, "rest request to create customer");
    if body.id.is_some() {
        return errors::bad_request_alert(
            ENTITY_NAME,
            errors::ID_EXISTS,
            "a new customer cannot already have an id",
        );
    }

    match services.customers_save(body).await {
        Ok(saved) => common::created("customers", &saved),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<Customer>,
) -> axum::response::Response {
    tracing::debug!(%id, ?body, "rest request to update customer");
    let Some(body_id) = body.id else {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_NULL, "invalid id");
    };
    if body_id != id {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_INVALID, "invalid id");
    }
    match services.customers_exists(&id).await {
        Ok(true) => {}
        Ok(false) => {
            return errors::bad_request_alert(ENTITY_NAME, errors::ID_NOT_FOUND, "entity not found");
        }
        Err(err) => return errors::service_error_to_response(err),
    }

    match services.customers_save(body).await {
        Ok(saved) => common::updated(&saved),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn partial_update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<CustomerPatch>,
) -> axum::response::Response {
    tracing::debug!(%id, ?body, "rest request to partially update customer");
    let Some(body_id) = body.id else {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_NULL, "invalid id");
    };
    if body_id != id {
        return errors::bad_request_alert(ENTITY_NAME, errors::ID_INVALID, "invalid id");
    }
    match services.customers_exists(&id).await {
        Ok(true) => {}
        Ok(false) => {
            return errors::bad_request_alert(ENTITY_NAME, errors::ID_NOT_FOUND, "entity not found");
        }
        Err(err) => return errors::service_error_to_response(err),
    }

    match services.customers_partial_update(body).await {
        Ok(Some(merged)) => common::updated(&merged),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<ListParams>,
) -> axum::response::Response {
    tracing::debug!("rest request to get all customers");
    match services.customers_find_all(params.sort().as_ref()).await {
        Ok(all) => (StatusCode::OK, Json(all)).into_response(),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    tracing::debug!(%id, "rest request to get customer");
    match services.customers_find_one(&id).await {
        Ok(Some(customer)) => (StatusCode::OK, Json(customer)).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
        Err(err) => errors::service_error_to_response(err),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    tracing::debug!(%id, "rest request to delete customer");
    match services.customers_delete(&id).await {
        Ok(()) => common::deleted(ENTITY_NAME, &id.to_string()),
        Err(err) => errors::service_error_to_response(err),
    }
}
