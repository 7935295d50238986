use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use brewhouse_infra::service::ServiceError;

/// Reason codes carried by `bad_request_alert` responses.
pub const ID_EXISTS: &str = "idexists";
pub const ID_NULL: &str = "idnull";
pub const ID_INVALID: &str = "idinvalid";
pub const ID_NOT_FOUND: &str = "idnotfound";

/// 400 with a machine-readable reason code and the affected entity name.
pub fn bad_request_alert(
    entity: &'static str,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "error": code,
            "entity": entity,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Service failures are opaque server errors unless the payload itself was
/// at fault; no retries anywhere.
pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::MissingId => json_error(StatusCode::BAD_REQUEST, ID_NULL, "missing id"),
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}
