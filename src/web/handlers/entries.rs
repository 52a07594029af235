//! Entry handlers for the web API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use crate::model::{EntryStatus, DEFAULT_SORTING_DIRECTION, DEFAULT_SORTING_ORDER};
use crate::storage::EntryQueryBuilder;
use crate::web::context::RequestContext;
use crate::web::dto::{
    ApiResponse, EntryListResponse, EntryResponse, ListOptions, ListQuery, OffsetQuery, Pagination,
    UnreadResponse, UpdateStatusRequest, UpdateStatusResponse,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// GET /api/unread - Unread entries, newest first.
pub async fn unread(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Query(query): Query<OffsetQuery>,
) -> Result<Json<ApiResponse<UnreadResponse>>, ApiError> {
    let user = ctx.logged_user(&state.storage).await?;

    let builder = state
        .storage
        .new_entry_query_builder(user.id, &user.timezone)
        .with_status(EntryStatus::Unread)
        .with_order(DEFAULT_SORTING_ORDER)
        .with_direction(DEFAULT_SORTING_DIRECTION)
        .with_offset(query.offset)
        .with_limit(state.entries_per_page);

    let entries = builder.get_entries().await?;
    let count_unread = builder.count_entries().await?;

    Ok(Json(ApiResponse::new(UnreadResponse {
        entries: entries.into_iter().map(EntryResponse::from).collect(),
        count_unread,
        pagination: Pagination::new(count_unread, query.offset, state.entries_per_page),
        csrf: ctx.csrf_token,
    })))
}

/// GET /api/entries/:id - Single entry with its enclosures.
pub async fn get_entry(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(entry_id): Path<i64>,
) -> Result<Json<ApiResponse<EntryResponse>>, ApiError> {
    let user = ctx.logged_user(&state.storage).await?;

    let entry = state
        .storage
        .new_entry_query_builder(user.id, &user.timezone)
        .with_entry_id(entry_id)
        .get_entry()
        .await?
        .ok_or_else(|| ApiError::not_found("entry not found"))?;

    Ok(Json(ApiResponse::new(EntryResponse::from(entry))))
}

/// GET /api/feeds/:id/entries - Entries of one feed.
pub async fn feed_entries(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(feed_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<EntryListResponse>>, ApiError> {
    let options = query.parse()?;
    let user = ctx.logged_user(&state.storage).await?;

    state
        .storage
        .feeds()
        .get(user.id, feed_id)
        .await?
        .ok_or_else(|| ApiError::not_found("feed not found"))?;

    let builder = state
        .storage
        .new_entry_query_builder(user.id, &user.timezone)
        .with_feed_id(feed_id);

    list(&state, &ctx, builder, options).await
}

/// GET /api/categories/:id/entries - Entries of every feed in a category.
pub async fn category_entries(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Path(category_id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<EntryListResponse>>, ApiError> {
    let options = query.parse()?;
    let user = ctx.logged_user(&state.storage).await?;

    state
        .storage
        .categories()
        .get(user.id, category_id)
        .await?
        .ok_or_else(|| ApiError::not_found("category not found"))?;

    let builder = state
        .storage
        .new_entry_query_builder(user.id, &user.timezone)
        .with_category_id(category_id);

    list(&state, &ctx, builder, options).await
}

/// POST /api/entries/status - Change the status of several entries.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<UpdateStatusResponse>>, ApiError> {
    let status: EntryStatus = request.status.parse()?;
    if request.entry_ids.is_empty() {
        return Err(ApiError::unprocessable("entry_ids must not be empty"));
    }

    let user = ctx.logged_user(&state.storage).await?;
    let updated = state
        .storage
        .entries()
        .set_entries_status(user.id, &request.entry_ids, status)
        .await?;

    Ok(Json(ApiResponse::new(UpdateStatusResponse { updated })))
}

async fn list(
    state: &AppState,
    ctx: &RequestContext,
    builder: EntryQueryBuilder<'_>,
    options: ListOptions,
) -> Result<Json<ApiResponse<EntryListResponse>>, ApiError> {
    let offset = options.offset;
    let builder = builder
        .with_status(options.status)
        .with_order(options.order)
        .with_direction(options.direction)
        .with_offset(offset)
        .with_limit(state.entries_per_page);

    let entries = builder.get_entries().await?;
    let total = builder.count_entries().await?;

    Ok(Json(ApiResponse::new(EntryListResponse {
        entries: entries.into_iter().map(EntryResponse::from).collect(),
        total,
        pagination: Pagination::new(total, offset, state.entries_per_page),
        csrf: ctx.csrf_token.clone(),
    })))
}
