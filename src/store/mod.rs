//! Product persistence.
//!
//! Handlers only see [`ProductStore`]; the Postgres implementation backs
//! production and the in-memory one backs tests and local runs without a
//! database.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use crate::error::AppError;
use crate::models::product::{Category, NewProduct, Product};

pub use memory::MemoryProductStore;
pub use postgres::PgProductStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Insertion order.
    #[default]
    Id,
    NewestFirst,
    TopRated,
}

/// Criteria for [`ProductStore::find`] and [`ProductStore::count`].
/// Unset criteria match every product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name.
    pub keyword: Option<String>,
    /// Category must be one of these, when non-empty.
    pub categories: Vec<i64>,
    pub price_range: Option<PriceRange>,
    pub exclude_id: Option<i64>,
    pub sort: ProductSort,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ProductQuery {
    pub fn sorted(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn limited(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filter predicate; sort, limit and offset are applied by the store.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(keyword) = &self.keyword {
            if !product.name.to_lowercase().contains(&keyword.to_lowercase()) {
                return false;
            }
        }
        if !self.categories.is_empty() && !self.categories.contains(&product.category_id) {
            return false;
        }
        if let Some(range) = self.price_range {
            if !range.contains(product.price) {
                return false;
            }
        }
        self.exclude_id != Some(product.id)
    }
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError>;

    /// Full field replacement. `None` when `id` does not exist.
    async fn replace(&self, id: i64, product: NewProduct) -> Result<Option<Product>, AppError>;

    /// Returns the removed document, `None` when nothing matched.
    async fn delete(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError>;

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError>;

    /// Number of products matching the filter part of `query`.
    async fn count(&self, query: &ProductQuery) -> Result<i64, AppError>;

    /// Every product, newest first, with its category row when one exists.
    async fn find_all_with_category(&self) -> Result<Vec<(Product, Option<Category>)>, AppError>;

    /// Persists `reviews`, `num_reviews` and `rating` of `product` only if the
    /// stored version still equals `product.version`. `None` means the product
    /// changed (or vanished) since it was read.
    async fn save_reviews(&self, product: &Product) -> Result<Option<Product>, AppError>;
}
