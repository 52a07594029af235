//! Middleware for the web API.

mod auth;

pub use auth::{jwt_auth, JwtClaims, JwtState};
