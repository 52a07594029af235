//! Web API module for FeedDeck.
//!
//! JSON endpoints over the entry query builder, authenticated with bearer
//! JWTs whose claims become a typed [`RequestContext`].

pub mod context;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use context::RequestContext;
pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
