pub mod health;
pub mod index;
pub mod users;

use axum::{routing::get, Router};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index_handler))
        .route(
            "/users",
            get(users::handle_list_users).post(users::handle_create_user),
        )
        .route("/health", get(health::health_handler))
        .with_state(state)
}
