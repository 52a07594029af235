//! FeedDeck - self-hosted feed aggregator.
//!
//! Entries of every user are read through the user-scoped
//! [`EntryQueryBuilder`]; a background [`scheduler`] refreshes feeds.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod timer;
pub mod web;

pub use config::Config;
pub use error::{FeedDeckError, Result};
pub use model::{Direction, Entry, EntryStatus, Job, SortOrder, User};
pub use storage::{EntryQuery, EntryQueryBuilder, Storage};
