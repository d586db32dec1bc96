// src/database.rs
use sqlx::postgres::{PgPool, PgPoolOptions};
use crate::error::AppError;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::internal(format!("Migration failed: {e}")))?;

    Ok(pool)
}
