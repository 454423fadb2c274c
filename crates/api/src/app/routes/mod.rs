use axum::{Router, routing::get};

pub mod brands;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/api/v1/brands", brands::router())
        .nest("/brands", brands::router())
}
