use axum::{
    Router,
    routing::{get, patch, post},
};

use super::controller::{
    apply, get_application, list_applications, list_dispatchers, my_application,
    review_application,
};
use crate::state::AppState;

/// Applicant routes. Mounted under `/dispatchers` behind the applicant gate.
pub fn init_dispatchers_router() -> Router<AppState> {
    Router::new()
        .route("/apply", post(apply))
        .route("/application", get(my_application))
}

/// Review routes. Mounted under `/admin` behind the admin gate.
pub fn init_admin_dispatchers_router() -> Router<AppState> {
    Router::new()
        .route("/dispatcher-applications", get(list_applications))
        .route("/dispatcher-applications/{id}", get(get_application))
        .route("/approve-dispatcher/{user_id}", patch(review_application))
        .route("/dispatchers", get(list_dispatchers))
}
