use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use tracing::error;

use super::{ProductQuery, ProductSort, ProductStore};
use crate::error::AppError;
use crate::models::product::{Category, NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, brand, category_id,
        price::FLOAT8 AS price, quantity, rating::FLOAT8 AS rating, num_reviews,
        reviews, version, created_at, updated_at";

#[derive(FromRow)]
struct ProductCategoryRow {
    #[sqlx(flatten)]
    product: Product,
    category_name: Option<String>,
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escapes LIKE metacharacters so the keyword is matched literally.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Product columns come from a subquery so the join reuses `PRODUCT_COLUMNS`.
fn all_with_category_sql() -> String {
    format!(
        "SELECT p.*, c.name AS category_name
         FROM (SELECT {PRODUCT_COLUMNS} FROM products) p
         LEFT JOIN categories c ON c.id = p.category_id
         ORDER BY p.created_at DESC, p.id DESC"
    )
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &ProductQuery) {
    builder.push(" WHERE 1=1");

    if let Some(keyword) = &query.keyword {
        builder.push(" AND name ILIKE ");
        builder.push_bind(like_pattern(keyword));
    }

    if !query.categories.is_empty() {
        builder.push(" AND category_id = ANY(");
        builder.push_bind(query.categories.clone());
        builder.push(")");
    }

    if let Some(range) = query.price_range {
        builder.push(" AND price BETWEEN ");
        builder.push_bind(range.min);
        builder.push(" AND ");
        builder.push_bind(range.max);
    }

    if let Some(id) = query.exclude_id {
        builder.push(" AND id <> ");
        builder.push_bind(id);
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert(&self, product: NewProduct) -> Result<Product, AppError> {
        let sql = format!(
            "INSERT INTO products (name, description, brand, category_id, price, quantity)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.brand)
            .bind(product.category_id)
            .bind(product.price)
            .bind(product.quantity)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to insert product");
                AppError::db(e)
            })
    }

    async fn replace(&self, id: i64, product: NewProduct) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET
             name = $1, description = $2, brand = $3, category_id = $4,
             price = $5, quantity = $6,
             version = version + 1, updated_at = NOW()
             WHERE id = $7 RETURNING {PRODUCT_COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.brand)
            .bind(product.category_id)
            .bind(product.price)
            .bind(product.quantity)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, id, "Failed to update product");
                AppError::db(e)
            })?;
        Ok(product)
    }

    async fn delete(&self, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!("DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, id, "Failed to delete product");
                AppError::db(e)
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Product>, AppError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, id, "Failed to fetch product");
                AppError::db(e)
            })
    }

    async fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {PRODUCT_COLUMNS} FROM products"));
        push_filters(&mut builder, query);

        builder.push(match query.sort {
            ProductSort::Id => " ORDER BY id",
            ProductSort::NewestFirst => " ORDER BY created_at DESC, id DESC",
            ProductSort::TopRated => " ORDER BY rating DESC, id",
        });

        if let Some(limit) = query.limit {
            builder.push(" LIMIT ");
            builder.push_bind(limit);
        }
        if query.offset > 0 {
            builder.push(" OFFSET ");
            builder.push_bind(query.offset);
        }

        builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to fetch products");
                AppError::db(e)
            })
    }

    async fn count(&self, query: &ProductQuery) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
        push_filters(&mut builder, query);
        builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to count products");
                AppError::db(e)
            })
    }

    async fn find_all_with_category(&self) -> Result<Vec<(Product, Option<Category>)>, AppError> {
        let rows = sqlx::query_as::<_, ProductCategoryRow>(&all_with_category_sql())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, "Failed to fetch products with categories");
                AppError::db(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let category = row.category_name.map(|name| Category {
                    id: row.product.category_id,
                    name,
                });
                (row.product, category)
            })
            .collect())
    }

    async fn save_reviews(&self, product: &Product) -> Result<Option<Product>, AppError> {
        let sql = format!(
            "UPDATE products SET
             reviews = $1, num_reviews = $2, rating = $3,
             version = version + 1, updated_at = NOW()
             WHERE id = $4 AND version = $5 RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(Json(product.reviews.0.clone()))
            .bind(product.num_reviews)
            .bind(product.rating)
            .bind(product.id)
            .bind(product.version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                error!(?e, product_id = product.id, "Failed to save reviews");
                AppError::db(e)
            })
    }
}
