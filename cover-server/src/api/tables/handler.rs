//! Tables API Handlers

use std::collections::BTreeMap;

use axum::{Json, extract::State};

use crate::core::ServerState;
use crate::occupancy;
use crate::utils::AppResult;
use shared::models::TableOccupancy;

/// GET /api/tables/counts - active covers per table
///
/// Public by design: only aggregate counts, never attendee identity. The
/// purchase map polls this to gray out full tables.
pub async fn counts(
    State(state): State<ServerState>,
) -> AppResult<Json<BTreeMap<String, i64>>> {
    let counts = occupancy::table_counts(&state.pool).await?;
    Ok(Json(counts))
}

/// GET /api/tables/occupancy - full occupancy map (authenticated)
pub async fn occupancy_map(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<TableOccupancy>>> {
    let map = occupancy::occupancy_map(&state.pool, &state.event).await?;
    Ok(Json(map))
}
