//! API handlers of the web API.

pub mod entries;

pub use entries::*;

use std::sync::Arc;

use crate::storage::Storage;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    /// Page size of entry listings.
    pub entries_per_page: u32,
}

impl AppState {
    pub fn new(storage: Arc<Storage>, entries_per_page: u32) -> Self {
        Self {
            storage,
            entries_per_page,
        }
    }
}
