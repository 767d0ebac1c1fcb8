//! HTTP route handlers.

pub mod content_item;
pub mod content_type;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Assemble all application routes. Middleware layers are added by the
/// binary (and by tests when they need them).
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(content_type::router())
        .merge(content_item::router())
        .merge(health::router())
}
