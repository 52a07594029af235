//! Feed, category and icon models.

use chrono::{DateTime, Utc};

/// Consecutive parsing errors after which a feed stops being scheduled.
pub const MAX_PARSING_ERROR: i32 = 3;

/// A user-owned category grouping feeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
}

/// Icon attached to a feed. `icon_id` is 0 when the feed has no icon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedIcon {
    pub feed_id: i64,
    pub icon_id: i64,
}

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feed {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub feed_url: String,
    pub site_url: String,
    /// Last time the refresher looked at this feed.
    pub checked_at: DateTime<Utc>,
    pub parsing_error_count: i32,
    pub parsing_error_msg: String,
    pub category: Category,
    pub icon: FeedIcon,
}

impl Feed {
    /// Whether the feed is still picked up by the job feeder.
    pub fn is_schedulable(&self) -> bool {
        self.parsing_error_count < MAX_PARSING_ERROR
    }
}

/// Data for subscribing to a new feed.
#[derive(Debug, Clone)]
pub struct NewFeed {
    pub user_id: i64,
    pub category_id: i64,
    pub title: String,
    pub feed_url: String,
    pub site_url: String,
    /// Initial `checked_at`; defaults to the Unix epoch so new feeds are refreshed first.
    pub checked_at: DateTime<Utc>,
}

impl NewFeed {
    /// Create a new feed subscription.
    pub fn new(
        user_id: i64,
        category_id: i64,
        title: impl Into<String>,
        feed_url: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            category_id,
            title: title.into(),
            feed_url: feed_url.into(),
            site_url: String::new(),
            checked_at: DateTime::<Utc>::default(),
        }
    }

    /// Set the site URL.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = site_url.into();
        self
    }

    /// Set the initial checked timestamp.
    pub fn with_checked_at(mut self, checked_at: DateTime<Utc>) -> Self {
        self.checked_at = checked_at;
        self
    }
}

/// A refresh job: re-fetch `feed_id` on behalf of `user_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Job {
    pub feed_id: i64,
    pub user_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_feed_defaults_to_epoch() {
        let feed = NewFeed::new(1, 2, "Example", "https://example.org/feed.xml");
        assert_eq!(feed.checked_at, DateTime::<Utc>::default());
        assert!(feed.site_url.is_empty());
    }

    #[test]
    fn test_is_schedulable() {
        let mut feed = Feed {
            id: 1,
            user_id: 1,
            title: "t".to_string(),
            feed_url: "https://example.org/feed.xml".to_string(),
            site_url: String::new(),
            checked_at: Utc::now(),
            parsing_error_count: 2,
            parsing_error_msg: String::new(),
            category: Category::default(),
            icon: FeedIcon::default(),
        };
        assert!(feed.is_schedulable());

        feed.parsing_error_count = MAX_PARSING_ERROR;
        assert!(!feed.is_schedulable());
    }
}
