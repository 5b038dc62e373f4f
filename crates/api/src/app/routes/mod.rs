use axum::{routing::get, Router};

pub mod inventory;
pub mod menu;
pub mod pos;
pub mod reports;
pub mod resources;
pub mod suppliers;
pub mod system;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .nest("/menu", menu::router())
        .nest("/pos", pos::router())
        .nest("/inventory", inventory::router())
        .nest("/suppliers", suppliers::router())
        .nest("/reports", reports::router())
        .nest("/resources", resources::router())
}
