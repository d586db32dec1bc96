pub mod products;
pub mod reviews;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(products::routes(state.clone()))
        .merge(reviews::routes(state))
}

/// Full application under the `/api` base path.
pub fn build_app(state: AppState) -> Router {
    let api = create_router(state.clone())
        .route("/", get(|| async { "Storefront Catalog API" }))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
