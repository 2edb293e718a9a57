//! Handler for stored mirror listing.

use axum::{
    Json,
    extract::{Query, State},
};
use validator::Validate;

use crate::api::dto::mirrors::MirrorsQuery;
use crate::domain::entities::Mirror;
use crate::error::AppError;
use crate::state::AppState;

/// Lists stored mirror records, most recently seen first.
///
/// # Endpoint
///
/// `GET /mirrors`
///
/// # Query Parameters
///
/// - `limit` (optional): Maximum records (default: 100, range 1..=1000)
/// - `country` (optional): Exact country code
/// - `merchant` (optional): Exact merchant name
///
/// # Errors
///
/// - 400 Bad Request if `limit` is out of range
/// - 500 Internal Server Error on database errors
pub async fn list_mirrors_handler(
    State(state): State<AppState>,
    Query(params): Query<MirrorsQuery>,
) -> Result<Json<Vec<Mirror>>, AppError> {
    params.validate()?;

    let mirrors = state.mirror_service.list(params.filter()).await?;

    Ok(Json(mirrors))
}
