//! Domain model shared by storage, web and scheduler.

mod entry;
mod feed;
mod user;

pub use entry::{
    Direction, Enclosure, Entry, EntryStatus, NewEnclosure, NewEntry, SortOrder,
    DEFAULT_SORTING_DIRECTION, DEFAULT_SORTING_ORDER,
};
pub use feed::{Category, Feed, FeedIcon, Job, NewFeed, MAX_PARSING_ERROR};
pub use user::{NewUser, Role, User};
