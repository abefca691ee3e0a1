use axum::Router;

pub mod demos;
pub mod system;

/// Router for everything mounted under `/api`.
pub fn router() -> Router {
    Router::new().merge(demos::router())
}
