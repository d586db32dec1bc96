// src/handlers/product.rs
use axum::{extract::State, http::StatusCode, Extension, Json};
use crate::dtos::product::{
    ExpandedProductResponse, FilterProductsRequest, ListProductsQuery, PaginatedProductsResponse,
    ProductFieldsRequest, ProductResponse,
};
use crate::error::AppError;
use crate::extract::{JsonBody, JsonOrForm, PathParam, QueryParams};
use crate::middleware::auth::AuthContext;
use crate::models::product::Product;
use crate::services::catalog::{
    self, Page, FEATURED_PRODUCTS_LIMIT, NEW_PRODUCTS_LIMIT, PAGE_SIZE,
};
use crate::state::AppState;
use crate::store::ProductQuery;
use tracing::{info, instrument};

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

async fn find_products(state: &AppState, query: &ProductQuery) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.store.find(query).await?;
    Ok(Json(to_responses(products)))
}

// POST /products - Create new product
#[instrument(skip(state, auth, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    JsonOrForm(payload): JsonOrForm<ProductFieldsRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    auth.require_admin("create products")?;
    let fields = payload.validate_for_create()?;

    let product = state.store.insert(fields).await?;
    info!(product_id = product.id, "Product created");

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

// PUT /products/{id} - Replace all product fields
#[instrument(skip(state, auth, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<i64>,
    JsonOrForm(payload): JsonOrForm<ProductFieldsRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    auth.require_admin("update products")?;
    let fields = payload.validate_for_update()?;

    let product = state
        .store
        .replace(id, fields)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// DELETE /products/{id} - Body is the removed product, or null if nothing matched
#[instrument(skip(state, auth))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Option<ProductResponse>>, AppError> {
    auth.require_admin("delete products")?;

    let removed = state.store.delete(id).await?;
    if removed.is_some() {
        info!(product_id = id, "Product deleted");
    }

    Ok(Json(removed.map(ProductResponse::from)))
}

// GET /products?keyword=&page= - Paginated name search
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    QueryParams(params): QueryParams<ListProductsQuery>,
) -> Result<Json<PaginatedProductsResponse>, AppError> {
    let mut query = catalog::search_query(params.keyword.as_deref());
    let total = state.store.count(&query).await?;

    let page = Page::new(params.page, total);
    query.offset = page.offset();
    query.limit = Some(PAGE_SIZE);
    let products = state.store.find(&query).await?;

    Ok(Json(PaginatedProductsResponse {
        products: to_responses(products),
        page: page.page,
        pages: page.pages,
        has_more: page.has_more,
    }))
}

// GET /products/all - Every product, newest first, category expanded
#[instrument(skip(state))]
pub async fn list_all_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExpandedProductResponse>>, AppError> {
    let rows = state.store.find_all_with_category().await?;
    Ok(Json(
        rows.into_iter()
            .map(|(product, category)| ExpandedProductResponse::expanded(product, category))
            .collect(),
    ))
}

// GET /products/{id}
#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    Ok(Json(ProductResponse::from(product)))
}

// GET /products/top
#[instrument(skip(state))]
pub async fn top_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    find_products(&state, &catalog::top_rated_query()).await
}

// GET /products/new
#[instrument(skip(state))]
pub async fn new_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    find_products(&state, &catalog::newest_query(NEW_PRODUCTS_LIMIT)).await
}

// GET /products/featured
#[instrument(skip(state))]
pub async fn featured_products(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    find_products(&state, &catalog::newest_query(FEATURED_PRODUCTS_LIMIT)).await
}

// POST /products/filter
#[instrument(skip(state))]
pub async fn filter_products(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<FilterProductsRequest>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let query = catalog::filter_query(&payload.checked, &payload.radio)?;
    find_products(&state, &query).await
}

// GET /products/{id}/recommended
#[instrument(skip(state))]
pub async fn recommended_products(
    State(state): State<AppState>,
    PathParam(id): PathParam<i64>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let source = state
        .store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Product not found"))?;

    find_products(&state, &catalog::recommended_query(&source)).await
}
