//! Entry query builder tests against an in-memory SQLite store.

#![cfg(all(feature = "sqlite", not(feature = "postgres")))]

mod common;

use chrono::{Datelike, Timelike};
use chrono_tz::Tz;

use common::{at, create_entry, create_fixture, create_storage, create_user};
use feeddeck::storage::Operator;
use feeddeck::{Direction, EntryStatus, FeedDeckError, SortOrder};

#[tokio::test]
async fn test_unread_newest_first() {
    let fx = create_fixture().await;

    let entries = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_status(EntryStatus::Unread)
        .with_order(SortOrder::PublishedAt)
        .with_direction(Direction::Desc)
        .get_entries()
        .await
        .unwrap();

    let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Episode 1", "Rust 3", "World 4", "World 2", "Rust 1", "World 1"]
    );
    assert!(entries.iter().all(|e| e.status == EntryStatus::Unread));
}

#[tokio::test]
async fn test_count_matches_unpaged_listing() {
    let fx = create_fixture().await;

    let builder = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_status(EntryStatus::Unread);

    let count = builder.count_entries().await.unwrap();
    let entries = builder.get_entries().await.unwrap();

    assert_eq!(count, 6);
    assert_eq!(entries.len() as i64, count);
}

#[tokio::test]
async fn test_count_ignores_paging() {
    let fx = create_fixture().await;

    let builder = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_order(SortOrder::Id)
        .with_limit(2)
        .with_offset(1);

    assert_eq!(builder.count_entries().await.unwrap(), 8);
    assert_eq!(builder.get_entries().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_pages_do_not_overlap() {
    let fx = create_fixture().await;

    let page = |offset| {
        fx.storage
            .new_entry_query_builder(fx.alice.id, "UTC")
            .with_order(SortOrder::Id)
            .with_direction(Direction::Asc)
            .with_limit(3)
            .with_offset(offset)
    };

    let first: Vec<i64> = page(0).get_entries().await.unwrap().iter().map(|e| e.id).collect();
    let second: Vec<i64> = page(3).get_entries().await.unwrap().iter().map(|e| e.id).collect();
    let third: Vec<i64> = page(6).get_entries().await.unwrap().iter().map(|e| e.id).collect();

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(third.len(), 2);
    assert!(first.iter().all(|id| !second.contains(id)));
    assert!(first.last() < second.first());
    assert!(second.last() < third.first());
}

#[tokio::test]
async fn test_offset_without_limit() {
    let fx = create_fixture().await;

    let entries = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .with_order(SortOrder::Id)
        .with_direction(Direction::Asc)
        .with_offset(5)
        .get_entries()
        .await
        .unwrap();

    assert_eq!(entries.len(), 3);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let fx = create_fixture().await;

    let alice_entries = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .get_entries()
        .await
        .unwrap();
    let bob_entries = fx
        .storage
        .new_entry_query_builder(fx.bob.id, &fx.bob.timezone)
        .get_entries()
        .await
        .unwrap();

    assert_eq!(alice_entries.len(), 8);
    assert_eq!(bob_entries.len(), 2);
    assert!(alice_entries.iter().all(|e| e.user_id == fx.alice.id));
    assert!(bob_entries.iter().all(|e| e.user_id == fx.bob.id));
}

#[tokio::test]
async fn test_foreign_filters_match_nothing() {
    let fx = create_fixture().await;

    // Bob asking for Alice's feed.
    let by_feed = fx
        .storage
        .new_entry_query_builder(fx.bob.id, &fx.bob.timezone)
        .with_feed_id(fx.world.id);
    assert_eq!(by_feed.count_entries().await.unwrap(), 0);
    assert!(by_feed.get_entries().await.unwrap().is_empty());

    // Bob asking for Alice's episode by id.
    let by_id = fx
        .storage
        .new_entry_query_builder(fx.bob.id, &fx.bob.timezone)
        .with_entry_id(fx.episode_id);
    assert!(by_id.get_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_feed_filter() {
    let fx = create_fixture().await;

    let entries = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_feed_id(fx.world.id)
        .get_entries()
        .await
        .unwrap();

    assert_eq!(entries.len(), 4);
    for entry in &entries {
        assert_eq!(entry.feed_id, fx.world.id);
        assert_eq!(entry.feed.id, fx.world.id);
        assert_eq!(entry.feed.title, "World");
        assert_eq!(entry.feed.feed_url, "https://news.example/world.xml");
        assert_eq!(entry.feed.category.id, fx.news.id);
        assert_eq!(entry.feed.category.title, "News");
    }
}

#[tokio::test]
async fn test_category_and_status_filter() {
    let fx = create_fixture().await;

    let builder = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_category_id(fx.tech.id)
        .with_status(EntryStatus::Unread);

    let entries = builder.get_entries().await.unwrap();
    assert_eq!(builder.count_entries().await.unwrap(), 3);
    assert!(entries.iter().all(|e| e.feed.category.id == fx.tech.id));
    assert!(entries.iter().any(|e| e.feed_id == fx.podcast.id));
    assert!(entries.iter().all(|e| e.title != "Rust 2"));
}

#[tokio::test]
async fn test_category_and_feed_combined() {
    let fx = create_fixture().await;

    // Rust lives in Tech, not in News.
    let mismatch = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_category_id(fx.news.id)
        .with_feed_id(fx.rust.id);
    assert_eq!(mismatch.count_entries().await.unwrap(), 0);

    let matching = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_category_id(fx.tech.id)
        .with_feed_id(fx.rust.id);
    assert_eq!(matching.count_entries().await.unwrap(), 3);
}

#[tokio::test]
async fn test_entry_id_range() {
    let fx = create_fixture().await;

    let all = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .with_order(SortOrder::Id)
        .with_direction(Direction::Asc)
        .get_entries()
        .await
        .unwrap();
    let low = all[1].id;
    let high = all[5].id;

    let between = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .with_entry_id_greater_than(low)
        .with_entry_id_lower_than(high)
        .with_order(SortOrder::Id)
        .with_direction(Direction::Asc)
        .get_entries()
        .await
        .unwrap();

    let ids: Vec<i64> = between.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![all[2].id, all[3].id, all[4].id]);
}

#[tokio::test]
async fn test_get_entry_with_enclosures() {
    let fx = create_fixture().await;

    let entry = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_entry_id(fx.episode_id)
        .get_entry()
        .await
        .unwrap()
        .expect("episode should be found");

    assert_eq!(entry.id, fx.episode_id);
    assert_eq!(entry.title, "Episode 1");
    assert_eq!(entry.url, "https://cast.example/1");
    assert_eq!(entry.enclosures.len(), 2);
    assert_eq!(entry.enclosures[0].url, "https://cast.example/1.mp3");
    assert_eq!(entry.enclosures[0].mime_type, "audio/mpeg");
    assert_eq!(entry.enclosures[0].size, 1024);
    assert!(entry.enclosures.iter().all(|e| e.entry_id == fx.episode_id));
}

#[tokio::test]
async fn test_get_entry_keeps_builder_limit() {
    let fx = create_fixture().await;

    let builder = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_feed_id(fx.world.id)
        .with_order(SortOrder::PublishedAt)
        .with_direction(Direction::Desc)
        .with_limit(50);

    let first = builder.get_entry().await.unwrap().expect("entry");
    assert_eq!(first.title, "World 4");
    assert!(first.enclosures.is_empty());

    assert_eq!(builder.get_entries().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_get_entry_missing() {
    let fx = create_fixture().await;

    let entry = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_entry_id(999_999)
        .get_entry()
        .await
        .unwrap();

    assert!(entry.is_none());
}

#[tokio::test]
async fn test_dates_are_converted_to_user_timezone() {
    let fx = create_fixture().await;

    let entry = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_entry_id(fx.episode_id)
        .get_entry()
        .await
        .unwrap()
        .unwrap();

    // 2024-07-01 22:30 UTC is past midnight in Paris (CEST).
    assert_eq!(entry.date.timezone(), Tz::Europe__Paris);
    assert_eq!(entry.date.day(), 2);
    assert_eq!(entry.date.hour(), 0);
    assert_eq!(entry.date.minute(), 30);
    assert_eq!(entry.date.to_rfc3339(), "2024-07-02T00:30:00+02:00");
    assert_eq!(entry.date.naive_utc(), at(2024, 7, 1, 22, 30).naive_utc());
}

#[tokio::test]
async fn test_unknown_timezone_falls_back_to_utc() {
    let fx = create_fixture().await;

    let entry = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "Mars/Olympus_Mons")
        .with_entry_id(fx.episode_id)
        .get_entry()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(entry.date.timezone(), Tz::UTC);
    assert_eq!(entry.date.hour(), 22);
}

#[tokio::test]
async fn test_extension_condition() {
    let fx = create_fixture().await;

    let entries = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .with_condition("e.title", Operator::Eq, "World 2")
        .with_condition("e.title", Operator::Eq, "World 2")
        .get_entries()
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "World 2");
}

#[tokio::test]
async fn test_status_update_is_scoped_to_owner() {
    let fx = create_fixture().await;

    let bob_entries = fx
        .storage
        .new_entry_query_builder(fx.bob.id, "UTC")
        .get_entries()
        .await
        .unwrap();
    let mut ids: Vec<i64> = bob_entries.iter().map(|e| e.id).collect();
    ids.push(fx.episode_id);

    let updated = fx
        .storage
        .entries()
        .set_entries_status(fx.bob.id, &ids, EntryStatus::Read)
        .await
        .unwrap();
    assert_eq!(updated, 2);

    let episode = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .with_entry_id(fx.episode_id)
        .get_entry()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(episode.status, EntryStatus::Unread);

    let unread_for_bob = fx
        .storage
        .new_entry_query_builder(fx.bob.id, "UTC")
        .with_status(EntryStatus::Unread)
        .count_entries()
        .await
        .unwrap();
    assert_eq!(unread_for_bob, 0);
}

#[tokio::test]
async fn test_empty_store() {
    let storage = create_storage().await;
    let user = create_user(&storage, "carol", "UTC").await;

    let builder = storage.new_entry_query_builder(user.id, &user.timezone);
    assert_eq!(builder.count_entries().await.unwrap(), 0);
    assert!(builder.get_entries().await.unwrap().is_empty());
    assert!(builder.get_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_entry_hash_is_ignored() {
    let fx = create_fixture().await;

    let entry = feeddeck::model::NewEntry::new(
        fx.alice.id,
        fx.world.id,
        "w1",
        "World 1 again",
        at(2024, 2, 1, 0, 0),
    );
    let inserted = fx.storage.entries().create_entry(&entry).await.unwrap();
    assert!(inserted.is_none());

    // Same hash in another feed is a different entry.
    let id = create_entry(
        &fx.storage,
        &fx.rust,
        "w1",
        "Crosspost",
        at(2024, 2, 1, 0, 0),
        EntryStatus::Unread,
    )
    .await;
    assert!(id > 0);
}

#[tokio::test]
async fn test_driver_failures_are_wrapped() {
    let fx = create_fixture().await;
    sqlx::query("DROP TABLE enclosures")
        .execute(fx.storage.pool())
        .await
        .unwrap();
    sqlx::query("DROP TABLE entries")
        .execute(fx.storage.pool())
        .await
        .unwrap();

    let builder = fx
        .storage
        .new_entry_query_builder(fx.alice.id, &fx.alice.timezone)
        .with_status(EntryStatus::Unread);

    match builder.count_entries().await {
        Err(FeedDeckError::Database(message)) => {
            assert!(message.starts_with("unable to count entries"), "{message}")
        }
        other => panic!("expected a database error, got {other:?}"),
    }
    match builder.get_entries().await {
        Err(FeedDeckError::Database(message)) => {
            assert!(message.starts_with("unable to get entries"), "{message}")
        }
        other => panic!("expected a database error, got {other:?}"),
    }
    assert!(matches!(
        builder.get_entry().await,
        Err(FeedDeckError::Database(_))
    ));
}

#[tokio::test]
async fn test_closed_pool_count_fails() {
    let fx = create_fixture().await;
    fx.storage.close().await;

    let result = fx
        .storage
        .new_entry_query_builder(fx.alice.id, "UTC")
        .count_entries()
        .await;
    assert!(matches!(result, Err(FeedDeckError::Database(_))));
}
