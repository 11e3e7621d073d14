use axum::{
    Router, middleware,
    routing::{get, patch, post, put},
};

use super::controller::{change_password, login, logout, me, signup, update_profile};
use crate::middleware::rate_limit::rate_limit_auth;
use crate::state::AppState;

pub fn init_auth_router(state: &AppState) -> Router<AppState> {
    let credential_routes = Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit_auth));

    Router::new()
        .merge(credential_routes)
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/update-profile", patch(update_profile))
        .route("/change-password", put(change_password))
}
