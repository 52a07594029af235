//! Database schema for FeedDeck.
//!
//! Tables are created with `IF NOT EXISTS` on every start. Each entry of the
//! returned slice is a single statement.

use super::sql::Dialect;

const SQLITE: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    timezone    TEXT NOT NULL DEFAULT 'UTC',
    language    TEXT NOT NULL DEFAULT 'en_US',
    role        TEXT NOT NULL DEFAULT 'user'    -- 'user', 'admin'
)"#,
    r#"
CREATE TABLE IF NOT EXISTS categories (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    UNIQUE (user_id, title)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS feeds (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id             INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id         INTEGER NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    title               TEXT NOT NULL,
    feed_url            TEXT NOT NULL,
    site_url            TEXT NOT NULL DEFAULT '',
    checked_at          TEXT NOT NULL,           -- RFC 3339, UTC
    parsing_error_count INTEGER NOT NULL DEFAULT 0,
    parsing_error_msg   TEXT NOT NULL DEFAULT '',
    UNIQUE (user_id, feed_url)
)"#,
    "CREATE INDEX IF NOT EXISTS idx_feeds_checked_at ON feeds(checked_at)",
    r#"
CREATE TABLE IF NOT EXISTS feed_icons (
    feed_id     INTEGER PRIMARY KEY REFERENCES feeds(id) ON DELETE CASCADE,
    icon_id     INTEGER NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS entries (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id         INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    feed_id         INTEGER NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    hash            TEXT NOT NULL,
    published_at    TEXT NOT NULL,               -- RFC 3339, UTC
    title           TEXT NOT NULL,
    url             TEXT NOT NULL DEFAULT '',
    author          TEXT NOT NULL DEFAULT '',
    content         TEXT NOT NULL DEFAULT '',
    status          TEXT NOT NULL DEFAULT 'unread'
                    CHECK (status IN ('unread', 'read', 'removed')),
    UNIQUE (feed_id, hash)
)"#,
    "CREATE INDEX IF NOT EXISTS idx_entries_user_status ON entries(user_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_entries_feed_id ON entries(feed_id)",
    r#"
CREATE TABLE IF NOT EXISTS enclosures (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    entry_id    INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    url         TEXT NOT NULL,
    mime_type   TEXT NOT NULL DEFAULT '',
    size        INTEGER NOT NULL DEFAULT 0
)"#,
    "CREATE INDEX IF NOT EXISTS idx_enclosures_entry_id ON enclosures(entry_id)",
];

const POSTGRES: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS users (
    id          BIGSERIAL PRIMARY KEY,
    username    TEXT NOT NULL UNIQUE,
    timezone    TEXT NOT NULL DEFAULT 'UTC',
    language    TEXT NOT NULL DEFAULT 'en_US',
    role        TEXT NOT NULL DEFAULT 'user'
)"#,
    r#"
CREATE TABLE IF NOT EXISTS categories (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title       TEXT NOT NULL,
    UNIQUE (user_id, title)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS feeds (
    id                  BIGSERIAL PRIMARY KEY,
    user_id             BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    category_id         BIGINT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    title               TEXT NOT NULL,
    feed_url            TEXT NOT NULL,
    site_url            TEXT NOT NULL DEFAULT '',
    checked_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    parsing_error_count INTEGER NOT NULL DEFAULT 0,
    parsing_error_msg   TEXT NOT NULL DEFAULT '',
    UNIQUE (user_id, feed_url)
)"#,
    "CREATE INDEX IF NOT EXISTS idx_feeds_checked_at ON feeds(checked_at)",
    r#"
CREATE TABLE IF NOT EXISTS feed_icons (
    feed_id     BIGINT PRIMARY KEY REFERENCES feeds(id) ON DELETE CASCADE,
    icon_id     BIGINT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS entries (
    id              BIGSERIAL PRIMARY KEY,
    user_id         BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    feed_id         BIGINT NOT NULL REFERENCES feeds(id) ON DELETE CASCADE,
    hash            TEXT NOT NULL,
    published_at    TIMESTAMPTZ NOT NULL,
    title           TEXT NOT NULL,
    url             TEXT NOT NULL DEFAULT '',
    author          TEXT NOT NULL DEFAULT '',
    content         TEXT NOT NULL DEFAULT '',
    status          TEXT NOT NULL DEFAULT 'unread'
                    CHECK (status IN ('unread', 'read', 'removed')),
    UNIQUE (feed_id, hash)
)"#,
    "CREATE INDEX IF NOT EXISTS idx_entries_user_status ON entries(user_id, status)",
    "CREATE INDEX IF NOT EXISTS idx_entries_feed_id ON entries(feed_id)",
    r#"
CREATE TABLE IF NOT EXISTS enclosures (
    id          BIGSERIAL PRIMARY KEY,
    user_id     BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    entry_id    BIGINT NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
    url         TEXT NOT NULL,
    mime_type   TEXT NOT NULL DEFAULT '',
    size        BIGINT NOT NULL DEFAULT 0
)"#,
    "CREATE INDEX IF NOT EXISTS idx_enclosures_entry_id ON enclosures(entry_id)",
];

/// DDL statements for `dialect`, in creation order.
pub(crate) fn statements(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::Sqlite => SQLITE,
        Dialect::Postgres => POSTGRES,
    }
}
