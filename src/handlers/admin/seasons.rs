use axum::{extract::Extension, Json};
use serde::Deserialize;

use crate::access::RequestContext;
use crate::database::models::Season;
use crate::database::{DatabaseManager, MembershipStore};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct CreateSeasonRequest {
    pub year: i32,
    pub name: String,
}

/// POST /api/admin/seasons - open a new season
pub async fn create(
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<CreateSeasonRequest>,
) -> ApiResult<Season> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("A season name is required"));
    }

    let pool = DatabaseManager::pool().await?;

    let exists: Option<(i32,)> = sqlx::query_as("SELECT year FROM seasons WHERE year = $1")
        .bind(payload.year)
        .fetch_optional(pool)
        .await?;
    if exists.is_some() {
        return Err(ApiError::conflict(format!("A {} season already exists", payload.year)));
    }

    let store = MembershipStore::new(pool.clone());
    let season = store.create_season(payload.year, payload.name.trim()).await?;

    tracing::info!(admin = %ctx.user.email, year = season.year, "season created");

    Ok(ApiResponse::created(season))
}
