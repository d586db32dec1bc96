use axum::{
    routing::{post, put},
    middleware, Router,
};
use crate::handlers::review::{add_review, delete_review, update_review};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/products/{id}/reviews", post(add_review))
        .route("/products/{id}/reviews/{review_id}", put(update_review).delete(delete_review))
        .layer(middleware::from_fn_with_state(state, require_auth))
}
