use axum::{extract::Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::access::RequestContext;
use crate::database::models::ConflictRecord;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/conflicts - the member's own conflicts in the current season
pub async fn list(Extension(ctx): Extension<RequestContext>) -> ApiResult<Vec<ConflictRecord>> {
    let pool = DatabaseManager::pool().await?;

    let conflicts = sqlx::query_as::<_, ConflictRecord>(
        r#"
        SELECT id, user_id, season_id, starts_on, ends_on, reason, created_at, updated_at
        FROM conflicts
        WHERE user_id = $1 AND season_id = $2
        ORDER BY starts_on
        "#,
    )
    .bind(ctx.user.user_id)
    .bind(ctx.season.id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(conflicts))
}

#[derive(Debug, Deserialize)]
pub struct SubmitConflictRequest {
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    pub reason: String,
}

/// POST /api/conflicts - submit a conflict for the current season
pub async fn submit(
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<SubmitConflictRequest>,
) -> ApiResult<ConflictRecord> {
    if payload.ends_on < payload.starts_on {
        return Err(ApiError::bad_request("Conflict must end on or after its start date"));
    }
    if payload.reason.trim().is_empty() {
        return Err(ApiError::bad_request("A reason is required"));
    }

    let pool = DatabaseManager::pool().await?;

    let conflict = sqlx::query_as::<_, ConflictRecord>(
        r#"
        INSERT INTO conflicts (id, user_id, season_id, starts_on, ends_on, reason)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, user_id, season_id, starts_on, ends_on, reason, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ctx.user.user_id)
    .bind(ctx.season.id)
    .bind(payload.starts_on)
    .bind(payload.ends_on)
    .bind(payload.reason.trim())
    .fetch_one(pool)
    .await?;

    tracing::info!(
        user = %ctx.user.email,
        season = ctx.season.year,
        "conflict submitted for {} through {}",
        conflict.starts_on,
        conflict.ends_on
    );

    Ok(ApiResponse::created(conflict))
}
