//! Enclosure repository for FeedDeck.

use super::DbPool;
use crate::model::{Enclosure, NewEnclosure};
use crate::{FeedDeckError, Result};

/// Repository for enclosure operations.
pub struct EnclosureRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EnclosureRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Attach an enclosure to an entry of `user_id`.
    pub async fn create(
        &self,
        user_id: i64,
        entry_id: i64,
        enclosure: &NewEnclosure,
    ) -> Result<Enclosure> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO enclosures (user_id, entry_id, url, mime_type, size)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(user_id)
        .bind(entry_id)
        .bind(&enclosure.url)
        .bind(&enclosure.mime_type)
        .bind(enclosure.size)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to create enclosure: {e}")))?;

        Ok(Enclosure {
            id,
            user_id,
            entry_id,
            url: enclosure.url.clone(),
            mime_type: enclosure.mime_type.clone(),
            size: enclosure.size,
        })
    }

    /// List the enclosures of an entry of `user_id`, in insertion order.
    pub async fn list_by_entry(&self, user_id: i64, entry_id: i64) -> Result<Vec<Enclosure>> {
        let rows: Vec<(i64, i64, i64, String, String, i64)> = sqlx::query_as(
            "SELECT id, user_id, entry_id, url, mime_type, size
             FROM enclosures WHERE user_id = $1 AND entry_id = $2 ORDER BY id ASC",
        )
        .bind(user_id)
        .bind(entry_id)
        .fetch_all(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to fetch enclosures: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(id, user_id, entry_id, url, mime_type, size)| Enclosure {
                id,
                user_id,
                entry_id,
                url,
                mime_type,
                size,
            })
            .collect())
    }
}
