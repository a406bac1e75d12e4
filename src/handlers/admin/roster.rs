use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;
use uuid::Uuid;

use crate::access::{RequestContext, Role};
use crate::database::{DatabaseManager, MembershipStore};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::services::mailer::mailer;

/// GET /api/admin/roster - everyone enrolled in the current season
pub async fn list(Extension(ctx): Extension<RequestContext>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    let roster = store.roster(ctx.season.id).await?;
    let members: Vec<Value> = roster
        .into_iter()
        .map(|(membership, email)| {
            json!({
                "user_id": membership.user_id,
                "email": email,
                "role": membership.role,
                "joined_at": membership.created_at,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({ "members": members })))
}

#[derive(Debug, Deserialize)]
pub struct AddToRosterRequest {
    pub email: String,
    pub role: Role,
}

/// POST /api/admin/roster - add a registered user to the current season
pub async fn add(
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<AddToRosterRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let user_row = sqlx::query(
        "SELECT id, name FROM users WHERE email = $1 AND trashed_at IS NULL AND deleted_at IS NULL",
    )
    .bind(&payload.email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("No registered user with that email"))?;

    let user_id: Uuid = user_row.get("id");

    let store = MembershipStore::new(pool.clone());
    let membership = store.enroll(user_id, ctx.season.id, payload.role).await?;

    tracing::info!(
        admin = %ctx.user.email,
        member = %payload.email,
        season = ctx.season.year,
        role = %payload.role,
        "roster addition"
    );

    // A failed welcome mail does not undo the enrollment.
    if let Err(e) = mailer()
        .enqueue(
            "season_welcome",
            user_id,
            json!({ "season": ctx.season.year, "role": payload.role }),
        )
        .await
    {
        tracing::error!("welcome mail failed: {}", e);
    }

    Ok(ApiResponse::created(json!({ "membership": membership })))
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub role: Role,
}

/// PUT /api/admin/roster/:user_id - change a member's role this season
pub async fn set_role(
    Extension(ctx): Extension<RequestContext>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ChangeRoleRequest>,
) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    let membership = store.set_role(user_id, ctx.season.id, payload.role).await?;

    tracing::info!(
        admin = %ctx.user.email,
        member = %user_id,
        season = ctx.season.year,
        role = %payload.role,
        "role change"
    );

    Ok(ApiResponse::success(json!({ "membership": membership })))
}

/// DELETE /api/admin/roster/:user_id - end a membership in this season
pub async fn remove(
    Extension(ctx): Extension<RequestContext>,
    Path(user_id): Path<Uuid>,
) -> Result<ApiResponse<()>, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    store.withdraw(user_id, ctx.season.id).await?;

    tracing::info!(
        admin = %ctx.user.email,
        member = %user_id,
        season = ctx.season.year,
        "roster removal"
    );

    Ok(ApiResponse::<()>::no_content())
}
