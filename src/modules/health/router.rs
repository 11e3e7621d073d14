use axum::{Router, middleware, routing::get};

use super::controller::health_check;
use crate::middleware::basic_auth::require_basic_auth;
use crate::state::AppState;

pub fn init_health_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ))
}
