use axum::{extract::State, http::StatusCode, Extension, Json};
use uuid::Uuid;
use crate::dtos::review::{MessageResponse, ReviewRequest};
use crate::error::AppError;
use crate::extract::{JsonOrForm, PathParam};
use crate::middleware::auth::AuthContext;
use crate::services::reviews::{mutate_reviews, ReviewChange, Reviewer};
use crate::state::AppState;
use tracing::{info, instrument};

fn reviewer(auth: &AuthContext) -> Reviewer<'_> {
    Reviewer { user_id: auth.user_id, username: &auth.username }
}

// POST /products/{id}/reviews
#[instrument(skip(state, auth, payload), fields(user_id = auth.user_id))]
pub async fn add_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam(id): PathParam<i64>,
    JsonOrForm(payload): JsonOrForm<ReviewRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let rating = payload.checked_rating()?;
    let change = ReviewChange::Add { rating, comment: payload.comment };

    let product = mutate_reviews(state.store.as_ref(), id, reviewer(&auth), change).await?;
    info!(product_id = id, num_reviews = product.num_reviews, "Review added");

    Ok((StatusCode::CREATED, Json(MessageResponse { message: "Review added" })))
}

// PUT /products/{id}/reviews/{review_id}
#[instrument(skip(state, auth, payload), fields(user_id = auth.user_id))]
pub async fn update_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam((id, review_id)): PathParam<(i64, String)>,
    JsonOrForm(payload): JsonOrForm<ReviewRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let rating = payload.checked_rating()?;
    let change = ReviewChange::Update {
        review_id: Uuid::parse_str(&review_id).ok(),
        rating,
        comment: payload.comment,
    };

    mutate_reviews(state.store.as_ref(), id, reviewer(&auth), change).await?;

    Ok(Json(MessageResponse { message: "Review updated" }))
}

// DELETE /products/{id}/reviews/{review_id}
#[instrument(skip(state, auth), fields(user_id = auth.user_id))]
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    PathParam((id, review_id)): PathParam<(i64, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let change = ReviewChange::Remove { review_id: Uuid::parse_str(&review_id).ok() };

    let product = mutate_reviews(state.store.as_ref(), id, reviewer(&auth), change).await?;
    info!(product_id = id, num_reviews = product.num_reviews, "Review deleted");

    Ok(Json(MessageResponse { message: "Review deleted" }))
}
