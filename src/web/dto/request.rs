//! Request DTOs for the web API.

use serde::Deserialize;

use crate::model::{Direction, EntryStatus, SortOrder, DEFAULT_SORTING_DIRECTION, DEFAULT_SORTING_ORDER};
use crate::Result;

/// `?offset=` of paged listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffsetQuery {
    #[serde(default)]
    pub offset: u32,
}

/// Query string of feed and category listings.
///
/// Tokens stay strings until [`ListQuery::parse`] so that unknown values
/// surface as validation errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub offset: u32,
    pub order: Option<String>,
    pub direction: Option<String>,
    pub status: Option<String>,
}

/// Validated listing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub offset: u32,
    pub order: SortOrder,
    pub direction: Direction,
    pub status: Option<EntryStatus>,
}

impl ListQuery {
    /// Parse the tokens, applying the default sorting.
    pub fn parse(&self) -> Result<ListOptions> {
        Ok(ListOptions {
            offset: self.offset,
            order: match self.order.as_deref() {
                Some(s) if !s.is_empty() => s.parse()?,
                _ => DEFAULT_SORTING_ORDER,
            },
            direction: match self.direction.as_deref() {
                Some(s) if !s.is_empty() => s.parse()?,
                _ => DEFAULT_SORTING_DIRECTION,
            },
            status: match self.status.as_deref() {
                Some(s) if !s.is_empty() => Some(s.parse()?),
                _ => None,
            },
        })
    }
}

/// Body of `POST /api/entries/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub entry_ids: Vec<i64>,
    pub status: String,
}
