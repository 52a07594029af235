//! Fluent entry query facade bound to a storage handle.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use futures::TryStreamExt;
use sqlx::Row;

use super::entry_query::EntryQuery;
use super::sql::{build_query, Operator, QueryArg};
use super::{DbRow, Storage};
use crate::model::{Category, Direction, Entry, EntryStatus, Feed, FeedIcon, SortOrder};
use crate::timer::ExecutionTimer;
use crate::{FeedDeckError, Result};

/// Builds and runs user-scoped entry queries.
///
/// ```ignore
/// let entries = storage
///     .new_entry_query_builder(user.id, &user.timezone)
///     .with_status(EntryStatus::Unread)
///     .with_order(SortOrder::PublishedAt)
///     .with_direction(Direction::Desc)
///     .with_limit(100)
///     .get_entries()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct EntryQueryBuilder<'a> {
    store: &'a Storage,
    query: EntryQuery,
}

impl<'a> EntryQueryBuilder<'a> {
    pub fn new(store: &'a Storage, user_id: i64, timezone: &str) -> Self {
        Self {
            store,
            query: EntryQuery::new(user_id, timezone),
        }
    }

    /// The query this builder runs.
    pub fn query(&self) -> &EntryQuery {
        &self.query
    }

    pub fn with_condition(
        mut self,
        column: &'static str,
        operator: Operator,
        value: impl Into<QueryArg>,
    ) -> Self {
        self.query = self.query.with_condition(column, operator, value);
        self
    }

    pub fn with_entry_id(mut self, entry_id: i64) -> Self {
        self.query = self.query.with_entry_id(entry_id);
        self
    }

    pub fn with_entry_id_greater_than(mut self, entry_id: i64) -> Self {
        self.query = self.query.with_entry_id_greater_than(entry_id);
        self
    }

    pub fn with_entry_id_lower_than(mut self, entry_id: i64) -> Self {
        self.query = self.query.with_entry_id_lower_than(entry_id);
        self
    }

    pub fn with_feed_id(mut self, feed_id: i64) -> Self {
        self.query = self.query.with_feed_id(feed_id);
        self
    }

    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.query = self.query.with_category_id(category_id);
        self
    }

    pub fn with_status(mut self, status: impl Into<Option<EntryStatus>>) -> Self {
        self.query = self.query.with_status(status);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.query = self.query.with_order(order);
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.query = self.query.with_direction(direction);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.query = self.query.with_limit(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.query = self.query.with_offset(offset);
        self
    }

    /// Count the entries matching the filters. Paging is ignored.
    pub async fn count_entries(&self) -> Result<i64> {
        let _timer = ExecutionTimer::start(format!(
            "[EntryQueryBuilder:CountEntries] {}",
            self.query.describe()
        ));

        let statement = self.query.count_statement();
        let row = build_query(&statement)
            .fetch_one(self.store.pool())
            .await
            .map_err(|e| FeedDeckError::Database(format!("unable to count entries: {e}")))?;

        row.try_get::<i64, _>(0)
            .map_err(|e| FeedDeckError::Database(format!("unable to count entries: {e}")))
    }

    /// Fetch a single entry with its enclosures.
    ///
    /// The builder's own limit is left untouched; `Ok(None)` when nothing matches.
    pub async fn get_entry(&self) -> Result<Option<Entry>> {
        let query = self.query.single();
        let _timer = ExecutionTimer::start(format!(
            "[EntryQueryBuilder:GetEntry] {}",
            query.describe()
        ));

        let mut entries = fetch_entries(self.store, &query).await?;

        if entries.len() != 1 {
            return Ok(None);
        }

        let mut entry = entries.remove(0);
        entry.enclosures = self
            .store
            .enclosures()
            .list_by_entry(entry.user_id, entry.id)
            .await?;
        Ok(Some(entry))
    }

    /// Fetch every matching entry, in database order.
    pub async fn get_entries(&self) -> Result<Vec<Entry>> {
        let _timer = ExecutionTimer::start(format!(
            "[EntryQueryBuilder:GetEntries] {}",
            self.query.describe()
        ));

        fetch_entries(self.store, &self.query).await
    }
}

async fn fetch_entries(store: &Storage, query: &EntryQuery) -> Result<Vec<Entry>> {
    let statement = query.select_statement(store.dialect());
    let timezone = query.timezone();

    let mut rows = build_query(&statement).fetch(store.pool());
    let mut entries = Vec::new();

    while let Some(row) = rows
        .try_next()
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to get entries: {e}")))?
    {
        let entry = hydrate_entry(&row, timezone)
            .map_err(|e| FeedDeckError::Database(format!("unable to fetch entry row: {e}")))?;
        entries.push(entry);
    }

    Ok(entries)
}

/// Build an entry from a row of [`EntryQuery::select_statement`].
///
/// Columns are read by position; the timezone projection has no stable name.
fn hydrate_entry(row: &DbRow, timezone: Tz) -> std::result::Result<Entry, sqlx::Error> {
    let id: i64 = row.try_get(0)?;
    let user_id: i64 = row.try_get(1)?;
    let feed_id: i64 = row.try_get(2)?;
    let status: String = row.try_get(9)?;
    let category_id: Option<i64> = row.try_get(14)?;
    let icon_id: Option<i64> = row.try_get(16)?;

    let checked_at: Option<DateTime<Utc>> = row.try_get(13)?;

    Ok(Entry {
        id,
        user_id,
        feed_id,
        hash: row.try_get(3)?,
        date: published_at(row, timezone)?,
        title: row.try_get(5)?,
        url: row.try_get(6)?,
        author: row.try_get(7)?,
        content: row.try_get(8)?,
        status: status.parse().map_err(|e: FeedDeckError| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?,
        feed: Feed {
            id: feed_id,
            user_id,
            title: row.try_get::<Option<String>, _>(10)?.unwrap_or_default(),
            feed_url: row.try_get::<Option<String>, _>(11)?.unwrap_or_default(),
            site_url: row.try_get::<Option<String>, _>(12)?.unwrap_or_default(),
            checked_at: checked_at.unwrap_or_default(),
            parsing_error_count: 0,
            parsing_error_msg: String::new(),
            category: Category {
                id: category_id.unwrap_or_default(),
                user_id,
                title: row.try_get::<Option<String>, _>(15)?.unwrap_or_default(),
            },
            icon: FeedIcon {
                feed_id,
                icon_id: icon_id.unwrap_or(0),
            },
        },
        enclosures: Vec::new(),
    })
}

/// Decode the projected `published_at` as a local time in `timezone`.
#[cfg(feature = "postgres")]
fn published_at(row: &DbRow, timezone: Tz) -> std::result::Result<DateTime<Tz>, sqlx::Error> {
    use chrono::{NaiveDateTime, TimeZone};

    let local: NaiveDateTime = row.try_get(4)?;
    Ok(timezone
        .from_local_datetime(&local)
        .earliest()
        .unwrap_or_else(|| Utc.from_utc_datetime(&local).with_timezone(&timezone)))
}

/// Decode the projected `published_at` as a local time in `timezone`.
#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
fn published_at(row: &DbRow, timezone: Tz) -> std::result::Result<DateTime<Tz>, sqlx::Error> {
    let utc: DateTime<Utc> = row.try_get(4)?;
    Ok(utc.with_timezone(&timezone))
}
