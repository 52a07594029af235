//! Entry and enclosure models, plus the closed token sets used to list entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use super::feed::Feed;
use crate::FeedDeckError;

/// Read state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryStatus {
    #[default]
    Unread,
    Read,
    Removed,
}

impl EntryStatus {
    /// All statuses, in display order.
    pub const ALL: [EntryStatus; 3] = [EntryStatus::Unread, EntryStatus::Read, EntryStatus::Removed];

    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Unread => "unread",
            EntryStatus::Read => "read",
            EntryStatus::Removed => "removed",
        }
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = FeedDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(EntryStatus::Unread),
            "read" => Ok(EntryStatus::Read),
            "removed" => Ok(EntryStatus::Removed),
            _ => Err(FeedDeckError::Validation(format!("invalid entry status: {s}"))),
        }
    }
}

/// Column an entry listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Id,
    PublishedAt,
    Status,
}

impl SortOrder {
    /// Column identifier, rendered quoted in `ORDER BY`.
    pub fn column(&self) -> &'static str {
        match self {
            SortOrder::Id => "id",
            SortOrder::PublishedAt => "published_at",
            SortOrder::Status => "status",
        }
    }
}

impl FromStr for SortOrder {
    type Err = FeedDeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortOrder::Id),
            "published_at" => Ok(SortOrder::PublishedAt),
            "status" => Ok(SortOrder::Status),
            _ => Err(FeedDeckError::Validation(format!("invalid sort order: {s}"))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// SQL keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = FeedDeckError;

    /// Accepts `asc`/`desc` in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(FeedDeckError::Validation(format!("invalid sort direction: {s}")))
        }
    }
}

/// Default ordering of entry listings.
pub const DEFAULT_SORTING_ORDER: SortOrder = SortOrder::PublishedAt;

/// Default direction of entry listings.
pub const DEFAULT_SORTING_DIRECTION: Direction = Direction::Desc;

/// A media attachment of an entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Enclosure {
    pub id: i64,
    pub user_id: i64,
    pub entry_id: i64,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}

/// A feed item as stored for one user.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub feed_id: i64,
    /// Content hash used to detect novel items on refresh.
    pub hash: String,
    /// Publication date in the reading user's timezone.
    pub date: DateTime<Tz>,
    pub title: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub status: EntryStatus,
    pub feed: Feed,
    /// Only populated on single-entry reads.
    pub enclosures: Vec<Enclosure>,
}

/// Data for creating an entry during a refresh.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user_id: i64,
    pub feed_id: i64,
    pub hash: String,
    pub published_at: DateTime<Utc>,
    pub title: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub status: EntryStatus,
    pub enclosures: Vec<NewEnclosure>,
}

impl NewEntry {
    /// Create a new unread entry.
    pub fn new(
        user_id: i64,
        feed_id: i64,
        hash: impl Into<String>,
        title: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            feed_id,
            hash: hash.into(),
            published_at,
            title: title.into(),
            url: String::new(),
            author: String::new(),
            content: String::new(),
            status: EntryStatus::Unread,
            enclosures: Vec::new(),
        }
    }

    /// Set the link to the original article.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the body.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach an enclosure.
    pub fn with_enclosure(mut self, enclosure: NewEnclosure) -> Self {
        self.enclosures.push(enclosure);
        self
    }
}

/// Data for creating an enclosure.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnclosure {
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}

impl NewEnclosure {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>, size: i64) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            size,
        }
    }
}
