use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::modules::users::controller::{
    create_user, delete_user, get_user, list_users, update_user,
};
use crate::state::AppState;

/// Admin user management. Mounted under `/admin` behind the admin gate.
pub fn init_admin_users_router() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/user", post(create_user))
        .route("/user/{id}", patch(update_user))
}
