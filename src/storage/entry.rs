//! Entry write operations for FeedDeck.
//!
//! Listings go through [`super::EntryQueryBuilder`]; this repository only
//! covers inserts and status changes.

use sqlx::QueryBuilder;

use super::{Db, DbPool};
use crate::model::{EntryStatus, NewEntry};
use crate::{FeedDeckError, Result};

/// Repository for entry writes.
pub struct EntryRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> EntryRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert an entry and its enclosures.
    ///
    /// Returns `None` when the feed already holds an entry with the same hash.
    pub async fn create_entry(&self, new_entry: &NewEntry) -> Result<Option<i64>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| FeedDeckError::Database(format!("unable to start transaction: {e}")))?;

        let id: Option<i64> = sqlx::query_scalar(
            "INSERT INTO entries (user_id, feed_id, hash, published_at, title, url, author, content, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT (feed_id, hash) DO NOTHING
             RETURNING id",
        )
        .bind(new_entry.user_id)
        .bind(new_entry.feed_id)
        .bind(&new_entry.hash)
        .bind(new_entry.published_at)
        .bind(&new_entry.title)
        .bind(&new_entry.url)
        .bind(&new_entry.author)
        .bind(&new_entry.content)
        .bind(new_entry.status.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to create entry: {e}")))?;

        let Some(id) = id else {
            return Ok(None);
        };

        for enclosure in &new_entry.enclosures {
            sqlx::query(
                "INSERT INTO enclosures (user_id, entry_id, url, mime_type, size)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(new_entry.user_id)
            .bind(id)
            .bind(&enclosure.url)
            .bind(&enclosure.mime_type)
            .bind(enclosure.size)
            .execute(&mut *tx)
            .await
            .map_err(|e| FeedDeckError::Database(format!("unable to create enclosure: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| FeedDeckError::Database(format!("unable to commit entry: {e}")))?;

        Ok(Some(id))
    }

    /// Check whether `feed_id` already has an entry with `hash`.
    pub async fn entry_exists(&self, feed_id: i64, hash: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT count(*) FROM entries WHERE feed_id = $1 AND hash = $2")
                .bind(feed_id)
                .bind(hash)
                .fetch_one(self.pool)
                .await
                .map_err(|e| FeedDeckError::Database(format!("unable to check entry: {e}")))?;
        Ok(count > 0)
    }

    /// Change the status of the listed entries owned by `user_id`.
    ///
    /// Returns the number of updated rows; ids of other users are ignored.
    pub async fn set_entries_status(
        &self,
        user_id: i64,
        entry_ids: &[i64],
        status: EntryStatus,
    ) -> Result<u64> {
        if entry_ids.is_empty() {
            return Ok(0);
        }

        let mut query: QueryBuilder<Db> = QueryBuilder::new("UPDATE entries SET status = ");
        query.push_bind(status.as_str());
        query.push(" WHERE user_id = ");
        query.push_bind(user_id);
        query.push(" AND id IN (");
        let mut separated = query.separated(", ");
        for id in entry_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| FeedDeckError::Database(format!("unable to update entries: {e}")))?;

        Ok(result.rows_affected())
    }
}
