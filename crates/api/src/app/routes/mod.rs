use axum::Router;

pub mod authorities;
pub mod coffees;
pub mod common;
pub mod customers;
pub mod system;

/// Router for all `/api` entity endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/coffees", coffees::router())
        .nest("/customers", customers::router())
        .nest("/authorities", authorities::router())
}
