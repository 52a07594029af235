//! Category repository for FeedDeck.

use super::DbPool;
use crate::model::Category;
use crate::{FeedDeckError, Result};

/// Repository for category operations.
pub struct CategoryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a category owned by `user_id`.
    pub async fn create(&self, user_id: i64, title: &str) -> Result<Category> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (user_id, title) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(title)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to create category: {e}")))?;

        Ok(Category {
            id,
            user_id,
            title: title.to_string(),
        })
    }

    /// Get a category of `user_id` by ID.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Category>> {
        let row: Option<(i64, i64, String)> = sqlx::query_as(
            "SELECT id, user_id, title FROM categories WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to fetch category: {e}")))?;

        Ok(row.map(|(id, user_id, title)| Category { id, user_id, title }))
    }
}
