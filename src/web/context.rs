//! Per-request session context.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::{debug, warn};

use super::error::ApiError;
use super::middleware::{JwtClaims, JwtState};
use crate::model::{Role, User};
use crate::storage::Storage;
use crate::{FeedDeckError, Result};

/// Typed session values of the current request.
///
/// Built from the bearer token's claims. Unset values default to an
/// anonymous UTC session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: i64,
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub timezone: String,
    pub csrf_token: String,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            user_id: 0,
            is_authenticated: false,
            is_admin: false,
            timezone: "UTC".to_string(),
            csrf_token: String::new(),
        }
    }
}

impl From<JwtClaims> for RequestContext {
    fn from(claims: JwtClaims) -> Self {
        if claims.csrf.is_empty() {
            warn!("No CSRF token in session of user #{}", claims.sub);
        }
        Self {
            user_id: claims.sub,
            is_authenticated: true,
            is_admin: claims.role.parse::<Role>().map(|r| r == Role::Admin).unwrap_or(false),
            timezone: if claims.tz.is_empty() {
                "UTC".to_string()
            } else {
                claims.tz
            },
            csrf_token: claims.csrf,
        }
    }
}

impl RequestContext {
    /// Load the logged user.
    ///
    /// A session pointing at a missing user is an authentication failure.
    pub async fn logged_user(&self, storage: &Storage) -> Result<User> {
        storage
            .users()
            .get_by_id(self.user_id)
            .await?
            .ok_or_else(|| FeedDeckError::Auth(format!("unable to find user {}", self.user_id)))
    }

    /// Locale of the logged user.
    pub async fn language(&self, storage: &Storage) -> Result<String> {
        Ok(self.logged_user(storage).await?.language)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> std::result::Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::unauthorized("Missing authorization"))?;

        let jwt_state = parts
            .extensions
            .get::<Arc<JwtState>>()
            .ok_or_else(|| ApiError::internal("JWT state not configured"))?;

        let claims = jwt_state.verify(token).map_err(|e| {
            debug!("JWT validation failed: {}", e);
            ApiError::unauthorized("Invalid or expired token")
        })?;

        Ok(RequestContext::from(claims))
    }
}
