use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One product document. Reviews are embedded, so a row is the whole aggregate.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: i32,
    pub rating: f64,
    pub num_reviews: i32,
    pub reviews: Json<Vec<Review>>,
    /// Bumped on every write; review saves are conditional on it.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user: i64,
    /// Username at the time the review was written.
    pub name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Validated field set used for both insert and full replacement.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub brand: String,
    pub category_id: i64,
    pub price: f64,
    pub quantity: i32,
}
