//! User repository for FeedDeck.

use super::DbPool;
use crate::model::{NewUser, Role, User};
use crate::{FeedDeckError, Result};

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user and return it with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, timezone, language, role) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.timezone)
        .bind(&new_user.language)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to create user: {e}")))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| FeedDeckError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, timezone, language, role FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| FeedDeckError::Database(format!("unable to fetch user: {e}")))?;

        Ok(row.map(UserRow::into_user))
    }
}

/// Internal struct for mapping database rows to User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    timezone: String,
    language: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            timezone: self.timezone,
            language: self.language,
            role: self.role.parse().unwrap_or(Role::User),
        }
    }
}
