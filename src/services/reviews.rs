//! Review lifecycle and the derived `rating` / `num_reviews` fields.
//!
//! Every mutation is read-modify-write against the store, guarded by the
//! product version so a concurrent writer cannot silently drop a review.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::product::{Product, Review};
use crate::store::ProductStore;

pub const MAX_SAVE_ATTEMPTS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct Reviewer<'a> {
    pub user_id: i64,
    pub username: &'a str,
}

#[derive(Debug, Clone)]
pub enum ReviewChange {
    Add { rating: i32, comment: String },
    /// `review_id` is `None` when the path segment was not a valid id.
    Update { review_id: Option<Uuid>, rating: i32, comment: String },
    Remove { review_id: Option<Uuid> },
}

/// Arithmetic mean of the ratings, 0 for no reviews.
pub fn average_rating(reviews: &[Review]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.rating)).sum();
    sum as f64 / reviews.len() as f64
}

pub fn refresh_aggregates(product: &mut Product) {
    product.num_reviews = i32::try_from(product.reviews.len()).unwrap_or(i32::MAX);
    product.rating = average_rating(&product.reviews);
}

fn owned_review_index(
    product: &Product,
    review_id: Option<Uuid>,
    reviewer: Reviewer<'_>,
    action: &str,
) -> Result<usize, AppError> {
    let index = review_id
        .and_then(|id| product.reviews.iter().position(|r| r.id == id))
        .ok_or_else(|| AppError::not_found("Review not found"))?;

    if product.reviews[index].user != reviewer.user_id {
        return Err(AppError::unauthorized(format!(
            "You are not authorized to {action} this review"
        )));
    }
    Ok(index)
}

/// Applies `change` to the in-memory product and refreshes its aggregates.
pub fn apply_change(
    product: &mut Product,
    reviewer: Reviewer<'_>,
    change: &ReviewChange,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    match change {
        ReviewChange::Add { rating, comment } => {
            if product.reviews.iter().any(|r| r.user == reviewer.user_id) {
                return Err(AppError::conflict("Product already reviewed"));
            }
            product.reviews.push(Review {
                id: Uuid::new_v4(),
                user: reviewer.user_id,
                name: reviewer.username.to_string(),
                rating: *rating,
                comment: comment.clone(),
                created_at: now,
            });
        }
        ReviewChange::Update { review_id, rating, comment } => {
            let index = owned_review_index(product, *review_id, reviewer, "update")?;
            let review = &mut product.reviews[index];
            review.rating = *rating;
            review.comment = comment.clone();
        }
        ReviewChange::Remove { review_id } => {
            let index = owned_review_index(product, *review_id, reviewer, "delete")?;
            product.reviews.remove(index);
        }
    }
    refresh_aggregates(product);
    Ok(())
}

/// Loads the product, applies `change` and saves it conditionally, re-reading
/// on a lost version race.
pub async fn mutate_reviews(
    store: &dyn ProductStore,
    product_id: i64,
    reviewer: Reviewer<'_>,
    change: ReviewChange,
) -> Result<Product, AppError> {
    for attempt in 1..=MAX_SAVE_ATTEMPTS {
        let mut product = store
            .find_by_id(product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Product not found"))?;

        apply_change(&mut product, reviewer, &change, Utc::now())?;

        match store.save_reviews(&product).await? {
            Some(saved) => return Ok(saved),
            None => warn!(product_id, attempt, "Product changed while saving reviews, retrying"),
        }
    }
    Err(AppError::conflict("Product was modified concurrently, please retry"))
}
