//! Response DTOs for the web API.

use serde::Serialize;

use crate::model::{Enclosure, Entry};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Offset-based pagination of entry listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub offset: u32,
    pub items_per_page: u32,
    pub show_next: bool,
    pub next_offset: u32,
    pub show_prev: bool,
    pub prev_offset: u32,
}

impl Pagination {
    pub fn new(total: i64, offset: u32, items_per_page: u32) -> Self {
        Self {
            total,
            offset,
            items_per_page,
            show_next: total - i64::from(offset) > i64::from(items_per_page),
            next_offset: offset.saturating_add(items_per_page),
            show_prev: offset > 0,
            prev_offset: offset.saturating_sub(items_per_page),
        }
    }
}

/// Category summary embedded in entries.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
}

/// Feed summary embedded in entries.
#[derive(Debug, Clone, Serialize)]
pub struct FeedResponse {
    pub id: i64,
    pub title: String,
    pub feed_url: String,
    pub site_url: String,
    /// RFC 3339, UTC.
    pub checked_at: String,
    pub icon_id: i64,
    pub category: CategoryResponse,
}

/// Enclosure of an entry.
#[derive(Debug, Clone, Serialize)]
pub struct EnclosureResponse {
    pub id: i64,
    pub url: String,
    pub mime_type: String,
    pub size: i64,
}

impl From<Enclosure> for EnclosureResponse {
    fn from(enclosure: Enclosure) -> Self {
        Self {
            id: enclosure.id,
            url: enclosure.url,
            mime_type: enclosure.mime_type,
            size: enclosure.size,
        }
    }
}

/// Entry as seen by its owner.
#[derive(Debug, Clone, Serialize)]
pub struct EntryResponse {
    pub id: i64,
    pub feed_id: i64,
    pub hash: String,
    /// RFC 3339 in the user's timezone.
    pub date: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub content: String,
    pub status: String,
    pub feed: FeedResponse,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub enclosures: Vec<EnclosureResponse>,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            feed_id: entry.feed_id,
            hash: entry.hash,
            date: entry.date.to_rfc3339(),
            title: entry.title,
            url: entry.url,
            author: entry.author,
            content: entry.content,
            status: entry.status.as_str().to_string(),
            feed: FeedResponse {
                id: entry.feed.id,
                title: entry.feed.title,
                feed_url: entry.feed.feed_url,
                site_url: entry.feed.site_url,
                checked_at: entry.feed.checked_at.to_rfc3339(),
                icon_id: entry.feed.icon.icon_id,
                category: CategoryResponse {
                    id: entry.feed.category.id,
                    title: entry.feed.category.title,
                },
            },
            enclosures: entry.enclosures.into_iter().map(Into::into).collect(),
        }
    }
}

/// Paged entry listing.
#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryResponse>,
    pub total: i64,
    pub pagination: Pagination,
    pub csrf: String,
}

/// Unread listing, with the unread counter.
#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub entries: Vec<EntryResponse>,
    pub count_unread: i64,
    pub pagination: Pagination,
    pub csrf: String,
}

/// Result of a status change.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub updated: u64,
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
