use axum::{
    routing::{get, post, put},
    middleware, Router,
};
use crate::handlers::product::{
    create_product, delete_product, featured_products, filter_products, get_product,
    list_all_products, list_products, new_products, recommended_products, top_products,
    update_product,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let open = Router::new()
        .route("/products", get(list_products))
        .route("/products/all", get(list_all_products))
        .route("/products/top", get(top_products))
        .route("/products/new", get(new_products))
        .route("/products/featured", get(featured_products))
        .route("/products/filter", post(filter_products))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/recommended", get(recommended_products));

    let protected = Router::new()
        .route("/products", post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .layer(middleware::from_fn_with_state(state, require_auth));

    open.merge(protected)
}
