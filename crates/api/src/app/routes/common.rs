use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use brewhouse_core::Entity;
use brewhouse_infra::store::Sort;

use crate::app::errors;

/// Query parameters accepted by list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub sort: Option<String>,
}

impl ListParams {
    pub fn sort(&self) -> Option<Sort> {
        self.sort.as_deref().and_then(Sort::parse)
    }
}

/// Informational headers naming the affected entity and identity; clients use
/// them for notifications, correctness does not depend on them.
fn alert_headers(entity: &str, action: &str, id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("brewhouse.{entity}.{action}")) {
        headers.insert("x-brewhouse-alert", value);
    }
    if let Ok(value) = HeaderValue::from_str(id) {
        headers.insert("x-brewhouse-params", value);
    }
    headers
}

/// 201 with a `Location` header pointing at the new row.
pub fn created<T: Entity + Serialize>(collection: &str, entity: &T) -> axum::response::Response {
    match entity.key() {
        Some(key) => {
            let mut headers = alert_headers(T::NAME, "created", &key.to_string());
            if let Ok(value) = HeaderValue::from_str(&format!("/api/{collection}/{key}")) {
                headers.insert(header::LOCATION, value);
            }
            (StatusCode::CREATED, headers, Json(entity)).into_response()
        }
        None => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "persisted entity has no identity",
        ),
    }
}

/// 200 with update alert headers.
pub fn updated<T: Entity + Serialize>(entity: &T) -> axum::response::Response {
    match entity.key() {
        Some(key) => {
            let headers = alert_headers(T::NAME, "updated", &key.to_string());
            (StatusCode::OK, headers, Json(entity)).into_response()
        }
        None => errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "persisted entity has no identity",
        ),
    }
}

/// 204 with deletion alert headers.
pub fn deleted(entity: &'static str, id: &str) -> axum::response::Response {
    (StatusCode::NO_CONTENT, alert_headers(entity, "deleted", id)).into_response()
}
