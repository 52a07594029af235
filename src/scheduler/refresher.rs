//! HTTP feed refresher.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tracing::{debug, error, warn};

use super::fetcher::{FeedFetcher, ParsedFeed, ParsedItem};
use super::worker::FeedRefresher;
use crate::model::{Feed, Job, NewEntry};
use crate::storage::Storage;
use crate::{FeedDeckError, Result};

/// Fetches a feed over HTTP and stores its novel entries.
pub struct HttpRefresher {
    storage: Arc<Storage>,
    fetcher: FeedFetcher,
}

impl HttpRefresher {
    pub fn new(storage: Arc<Storage>, fetcher: FeedFetcher) -> Self {
        Self { storage, fetcher }
    }

    /// Store the entries of `parsed` that `feed` does not hold yet.
    ///
    /// The feed is marked checked afterwards, which clears its error counter.
    pub async fn store_entries(&self, feed: &Feed, parsed: ParsedFeed) -> Result<usize> {
        let entries = self.storage.entries();
        let mut created = 0;

        for item in parsed.items {
            let new_entry = new_entry(feed, item);
            match entries.create_entry(&new_entry).await {
                Ok(Some(_)) => created += 1,
                Ok(None) => {}
                Err(e) => error!("Unable to store entry for feed #{}: {}", feed.id, e),
            }
        }

        self.storage
            .feeds()
            .update_feed_checked(feed.id, Utc::now())
            .await?;
        Ok(created)
    }
}

#[async_trait]
impl FeedRefresher for HttpRefresher {
    async fn refresh(&self, job: Job) -> Result<usize> {
        let feed = self
            .storage
            .feeds()
            .get(job.user_id, job.feed_id)
            .await?
            .ok_or_else(|| FeedDeckError::NotFound(format!("feed #{}", job.feed_id)))?;

        debug!("Refreshing feed #{}: {}", feed.id, feed.feed_url);

        match self.fetcher.fetch(&feed.feed_url).await {
            Ok(parsed) => self.store_entries(&feed, parsed).await,
            Err(e) => {
                warn!("Unable to fetch feed #{}: {}", feed.id, e);
                self.storage
                    .feeds()
                    .increment_parsing_error(feed.id, &e.to_string(), Utc::now())
                    .await?;
                Err(e)
            }
        }
    }
}

/// Stable identity of an item within its feed.
///
/// Items without a guid fall back to their link, then to their title.
pub fn entry_hash(item: &ParsedItem) -> String {
    let source = if !item.guid.is_empty() {
        item.guid.as_str()
    } else if let Some(url) = item.url.as_deref().filter(|u| !u.is_empty()) {
        url
    } else {
        item.title.as_str()
    };
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

fn new_entry(feed: &Feed, item: ParsedItem) -> NewEntry {
    let hash = entry_hash(&item);
    let mut entry = NewEntry::new(
        feed.user_id,
        feed.id,
        hash,
        item.title,
        item.published_at.unwrap_or_else(Utc::now),
    );
    if let Some(url) = item.url {
        entry = entry.with_url(url);
    }
    if let Some(author) = item.author {
        entry = entry.with_author(author);
    }
    if let Some(content) = item.content {
        entry = entry.with_content(content);
    }
    for enclosure in item.enclosures {
        entry = entry.with_enclosure(enclosure);
    }
    entry
}
