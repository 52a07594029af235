//! Test helpers for storage and API tests.
//!
//! Provides an in-memory storage and a small fixture of users, categories,
//! feeds and entries.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

use feeddeck::model::{Category, Feed, NewEnclosure, NewEntry, NewFeed, NewUser, User};
use feeddeck::{EntryStatus, Storage};

/// Create an in-memory storage with the schema applied.
pub async fn create_storage() -> Storage {
    Storage::open_in_memory()
        .await
        .expect("Failed to create test storage")
}

/// Timestamp helper for deterministic fixtures.
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

/// Create a user with the given timezone.
pub async fn create_user(storage: &Storage, username: &str, timezone: &str) -> User {
    storage
        .users()
        .create(&NewUser::new(username).with_timezone(timezone))
        .await
        .expect("Failed to create user")
}

/// Create a category for a user.
pub async fn create_category(storage: &Storage, user: &User, title: &str) -> Category {
    storage
        .categories()
        .create(user.id, title)
        .await
        .expect("Failed to create category")
}

/// Subscribe a user to a feed.
pub async fn create_feed(
    storage: &Storage,
    user: &User,
    category: &Category,
    title: &str,
    feed_url: &str,
) -> Feed {
    storage
        .feeds()
        .create(&NewFeed::new(user.id, category.id, title, feed_url))
        .await
        .expect("Failed to create feed")
}

/// Insert an entry and return its id.
pub async fn create_entry(
    storage: &Storage,
    feed: &Feed,
    hash: &str,
    title: &str,
    published_at: DateTime<Utc>,
    status: EntryStatus,
) -> i64 {
    let entry = NewEntry::new(feed.user_id, feed.id, hash, title, published_at)
        .with_url(format!("https://example.org/{hash}"))
        .with_status(status);

    storage
        .entries()
        .create_entry(&entry)
        .await
        .expect("Failed to create entry")
        .expect("Entry should be new")
}

/// A populated store used by several tests.
pub struct Fixture {
    pub storage: Storage,
    pub alice: User,
    pub bob: User,
    pub news: Category,
    pub tech: Category,
    pub world: Feed,
    pub rust: Feed,
    pub podcast: Feed,
    pub bob_feed: Feed,
    /// Id of the entry carrying an enclosure.
    pub episode_id: i64,
}

/// Alice (Europe/Paris) owns three feeds in two categories; Bob (UTC) owns one.
///
/// Alice's entries:
/// - world: 3 unread, 1 read
/// - rust: 2 unread, 1 removed
/// - podcast: 1 unread episode with an enclosure
pub async fn create_fixture() -> Fixture {
    let storage = create_storage().await;

    let alice = create_user(&storage, "alice", "Europe/Paris").await;
    let bob = create_user(&storage, "bob", "UTC").await;

    let news = create_category(&storage, &alice, "News").await;
    let tech = create_category(&storage, &alice, "Tech").await;
    let bob_misc = create_category(&storage, &bob, "Misc").await;

    let world = create_feed(&storage, &alice, &news, "World", "https://news.example/world.xml").await;
    let rust = create_feed(&storage, &alice, &tech, "Rust", "https://blog.example/rust.xml").await;
    let podcast = create_feed(&storage, &alice, &tech, "Cast", "https://cast.example/feed.xml").await;
    let bob_feed = create_feed(&storage, &bob, &bob_misc, "World", "https://news.example/world.xml").await;

    create_entry(&storage, &world, "w1", "World 1", at(2024, 1, 1, 8, 0), EntryStatus::Unread).await;
    create_entry(&storage, &world, "w2", "World 2", at(2024, 1, 2, 8, 0), EntryStatus::Unread).await;
    create_entry(&storage, &world, "w3", "World 3", at(2024, 1, 3, 8, 0), EntryStatus::Read).await;
    create_entry(&storage, &world, "w4", "World 4", at(2024, 1, 4, 8, 0), EntryStatus::Unread).await;

    create_entry(&storage, &rust, "r1", "Rust 1", at(2024, 1, 1, 12, 0), EntryStatus::Unread).await;
    create_entry(&storage, &rust, "r2", "Rust 2", at(2024, 1, 5, 12, 0), EntryStatus::Removed).await;
    create_entry(&storage, &rust, "r3", "Rust 3", at(2024, 1, 6, 12, 0), EntryStatus::Unread).await;

    let episode = NewEntry::new(alice.id, podcast.id, "p1", "Episode 1", at(2024, 7, 1, 22, 30))
        .with_url("https://cast.example/1")
        .with_enclosure(NewEnclosure::new("https://cast.example/1.mp3", "audio/mpeg", 1024))
        .with_enclosure(NewEnclosure::new("https://cast.example/1.jpg", "image/jpeg", 64));
    let episode_id = storage
        .entries()
        .create_entry(&episode)
        .await
        .expect("Failed to create episode")
        .expect("Episode should be new");

    create_entry(&storage, &bob_feed, "w1", "World 1", at(2024, 1, 1, 8, 0), EntryStatus::Unread).await;
    create_entry(&storage, &bob_feed, "b2", "Bob only", at(2024, 1, 9, 8, 0), EntryStatus::Unread).await;

    Fixture {
        storage,
        alice,
        bob,
        news,
        tech,
        world,
        rust,
        podcast,
        bob_feed,
        episode_id,
    }
}
