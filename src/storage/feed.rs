//! Feed repository for FeedDeck.

use chrono::{DateTime, Utc};

use super::DbPool;
use crate::model::{Category, Feed, FeedIcon, NewFeed};
use crate::{FeedDeckError, Result};

/// Repository for feed operations.
pub struct FeedRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FeedRepository<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a feed and return it with the assigned ID.
    pub async fn create(&self, new_feed: &NewFeed) -> Result<Feed> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO feeds (user_id, category_id, title, feed_url, site_url, checked_at)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(new_feed.user_id)
        .bind(new_feed.category_id)
        .bind(&new_feed.title)
        .bind(&new_feed.feed_url)
        .bind(&new_feed.site_url)
        .bind(new_feed.checked_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to create feed: {e}")))?;

        self.get(new_feed.user_id, id)
            .await?
            .ok_or_else(|| FeedDeckError::NotFound("feed".to_string()))
    }

    /// Get a feed of `user_id` with its category and icon.
    pub async fn get(&self, user_id: i64, id: i64) -> Result<Option<Feed>> {
        let row: Option<FeedRow> = sqlx::query_as(
            "SELECT f.id, f.user_id, f.title, f.feed_url, f.site_url, f.checked_at,
                    f.parsing_error_count, f.parsing_error_msg,
                    f.category_id, c.title AS category_title, fi.icon_id
             FROM feeds f
             LEFT JOIN categories c ON c.id = f.category_id
             LEFT JOIN feed_icons fi ON fi.feed_id = f.id
             WHERE f.user_id = $1 AND f.id = $2",
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to fetch feed: {e}")))?;

        Ok(row.map(FeedRow::into_feed))
    }

    /// Record a successful refresh: sets `checked_at` and clears the error counter.
    pub async fn update_feed_checked(&self, feed_id: i64, checked_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE feeds SET checked_at = $1, parsing_error_count = 0, parsing_error_msg = ''
             WHERE id = $2",
        )
        .bind(checked_at)
        .bind(feed_id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to update feed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a failed refresh.
    pub async fn increment_parsing_error(
        &self,
        feed_id: i64,
        message: &str,
        checked_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE feeds SET parsing_error_count = parsing_error_count + 1,
                              parsing_error_msg = $1, checked_at = $2
             WHERE id = $3",
        )
        .bind(message)
        .bind(checked_at)
        .bind(feed_id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to update feed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Make a feed of `user_id` schedulable again.
    pub async fn reset_parsing_error(&self, user_id: i64, feed_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE feeds SET parsing_error_count = 0, parsing_error_msg = ''
             WHERE user_id = $1 AND id = $2",
        )
        .bind(user_id)
        .bind(feed_id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to update feed: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    /// Attach an icon to a feed, replacing any previous one.
    pub async fn set_icon(&self, feed_id: i64, icon_id: i64) -> Result<()> {
        sqlx::query(
            "INSERT INTO feed_icons (feed_id, icon_id) VALUES ($1, $2)
             ON CONFLICT (feed_id) DO UPDATE SET icon_id = excluded.icon_id",
        )
        .bind(feed_id)
        .bind(icon_id)
        .execute(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to set feed icon: {e}")))?;

        Ok(())
    }
}

/// Internal struct for mapping database rows to Feed.
#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    user_id: i64,
    title: String,
    feed_url: String,
    site_url: String,
    checked_at: DateTime<Utc>,
    parsing_error_count: i32,
    parsing_error_msg: String,
    category_id: i64,
    category_title: Option<String>,
    icon_id: Option<i64>,
}

impl FeedRow {
    fn into_feed(self) -> Feed {
        Feed {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            feed_url: self.feed_url,
            site_url: self.site_url,
            checked_at: self.checked_at,
            parsing_error_count: self.parsing_error_count,
            parsing_error_msg: self.parsing_error_msg,
            category: Category {
                id: self.category_id,
                user_id: self.user_id,
                title: self.category_title.unwrap_or_default(),
            },
            icon: FeedIcon {
                feed_id: self.id,
                icon_id: self.icon_id.unwrap_or(0),
            },
        }
    }
}

#[cfg(all(test, feature = "sqlite", not(feature = "postgres")))]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::model::{NewFeed, NewUser};
    use crate::storage::Storage;

    async fn setup() -> (Storage, i64, i64) {
        let storage = Storage::open_in_memory().await.unwrap();
        let user = storage.users().create(&NewUser::new("alice")).await.unwrap();
        let category = storage.categories().create(user.id, "Tech").await.unwrap();
        (storage, user.id, category.id)
    }

    #[tokio::test]
    async fn test_create_and_get_feed() {
        let (storage, user_id, category_id) = setup().await;
        let checked_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let feed = storage
            .feeds()
            .create(
                &NewFeed::new(user_id, category_id, "Blog", "https://example.com/feed.xml")
                    .with_site_url("https://example.com")
                    .with_checked_at(checked_at),
            )
            .await
            .unwrap();

        assert_eq!(feed.title, "Blog");
        assert_eq!(feed.site_url, "https://example.com");
        assert_eq!(feed.checked_at, checked_at);
        assert_eq!(feed.category.id, category_id);
        assert_eq!(feed.category.title, "Tech");
        assert_eq!(feed.icon.icon_id, 0);
        assert_eq!(feed.parsing_error_count, 0);
    }

    #[tokio::test]
    async fn test_get_feed_of_other_user() {
        let (storage, user_id, category_id) = setup().await;
        let feed = storage
            .feeds()
            .create(&NewFeed::new(user_id, category_id, "Blog", "https://example.com/rss"))
            .await
            .unwrap();

        assert!(storage
            .feeds()
            .get(user_id + 1, feed.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_parsing_error_lifecycle() {
        let (storage, user_id, category_id) = setup().await;
        let feeds = storage.feeds();
        let feed = feeds
            .create(&NewFeed::new(user_id, category_id, "Blog", "https://example.com/rss"))
            .await
            .unwrap();
        let now = Utc::now();

        for _ in 0..3 {
            assert!(feeds
                .increment_parsing_error(feed.id, "invalid XML", now)
                .await
                .unwrap());
        }
        let broken = feeds.get(user_id, feed.id).await.unwrap().unwrap();
        assert_eq!(broken.parsing_error_count, 3);
        assert_eq!(broken.parsing_error_msg, "invalid XML");
        assert!(!broken.is_schedulable());

        feeds
            .update_feed_checked(feed.id, now + Duration::minutes(5))
            .await
            .unwrap();
        let healed = feeds.get(user_id, feed.id).await.unwrap().unwrap();
        assert_eq!(healed.parsing_error_count, 0);
        assert_eq!(healed.parsing_error_msg, "");
        assert!(healed.is_schedulable());
    }

    #[tokio::test]
    async fn test_reset_parsing_error_is_user_scoped() {
        let (storage, user_id, category_id) = setup().await;
        let feeds = storage.feeds();
        let feed = feeds
            .create(&NewFeed::new(user_id, category_id, "Blog", "https://example.com/rss"))
            .await
            .unwrap();
        feeds
            .increment_parsing_error(feed.id, "timeout", Utc::now())
            .await
            .unwrap();

        assert!(!feeds.reset_parsing_error(user_id + 1, feed.id).await.unwrap());
        assert!(feeds.reset_parsing_error(user_id, feed.id).await.unwrap());
        assert_eq!(
            feeds.get(user_id, feed.id).await.unwrap().unwrap().parsing_error_count,
            0
        );
    }

    #[tokio::test]
    async fn test_set_icon_replaces_previous() {
        let (storage, user_id, category_id) = setup().await;
        let feeds = storage.feeds();
        let feed = feeds
            .create(&NewFeed::new(user_id, category_id, "Blog", "https://example.com/rss"))
            .await
            .unwrap();

        feeds.set_icon(feed.id, 10).await.unwrap();
        feeds.set_icon(feed.id, 11).await.unwrap();

        let feed = feeds.get(user_id, feed.id).await.unwrap().unwrap();
        assert_eq!(feed.icon.feed_id, feed.id);
        assert_eq!(feed.icon.icon_id, 11);
    }
}
