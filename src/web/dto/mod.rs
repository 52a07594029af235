//! Data transfer objects of the web API.

mod request;
mod response;

pub use request::{ListOptions, ListQuery, OffsetQuery, UpdateStatusRequest};
pub use response::{
    ApiResponse, CategoryResponse, EnclosureResponse, EntryListResponse, EntryResponse,
    FeedResponse, HealthResponse, Pagination, UnreadResponse, UpdateStatusResponse,
};
