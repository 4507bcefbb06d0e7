//! Album catalog read endpoints

use axum::extract::{Path, State};
use axum::Json;

use ceazy_common::Album;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/albums
///
/// Returns the full catalog in insertion order.
pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Json<Vec<Album>>> {
    let albums = state.store.all_albums().await?;
    Ok(Json(albums))
}

/// GET /api/albums/:id
pub async fn get_album(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Album>> {
    let id = parse_album_id(&raw_id)?;
    let album = state.store.album(id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(album))
}

/// Album ids are positive integers; anything else is a client error,
/// not a lookup miss.
pub(crate) fn parse_album_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid album id: {raw}")))
}
