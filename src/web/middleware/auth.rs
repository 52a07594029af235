//! JWT authentication middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::User;
use crate::{FeedDeckError, Result};

/// JWT claims carried by every authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// User role.
    pub role: String,
    /// User timezone.
    #[serde(default = "default_timezone")]
    pub tz: String,
    /// CSRF token bound to the session.
    #[serde(default)]
    pub csrf: String,
    /// Expiration timestamp.
    pub exp: u64,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl JwtClaims {
    /// Claims for `user`, valid for `ttl_secs` from now.
    pub fn for_user(user: &User, csrf: impl Into<String>, ttl_secs: u64) -> Self {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        Self {
            sub: user.id,
            role: user.role.as_str().to_string(),
            tz: user.timezone.clone(),
            csrf: csrf.into(),
            exp: now + ttl_secs,
        }
    }
}

/// Keys and validation settings for JWT handling.
#[derive(Clone)]
pub struct JwtState {
    /// Decoding key for JWT verification.
    pub decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    /// Validation settings.
    pub validation: Validation,
}

impl JwtState {
    /// Create a new JWT state from a secret key.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign `claims` into a token.
    pub fn issue(&self, claims: &JwtClaims) -> Result<String> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| FeedDeckError::Auth(format!("unable to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| FeedDeckError::Auth(format!("invalid token: {e}")))
    }
}

/// Middleware function to inject JWT state into request extensions.
pub async fn jwt_auth(jwt_state: Arc<JwtState>, mut request: Request<Body>, next: Next) -> Response {
    request.extensions_mut().insert(jwt_state);
    next.run(request).await
}
