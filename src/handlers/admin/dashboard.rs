use axum::extract::Extension;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::access::RequestContext;
use crate::database::DatabaseManager;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/admin/dashboard - per-season counts for the admin landing page
pub async fn show(Extension(ctx): Extension<RequestContext>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let season_id = ctx.season.id;

    let members: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM role_memberships WHERE season_id = $1")
            .bind(season_id)
            .fetch_one(pool)
            .await?;

    let conflicts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conflicts WHERE season_id = $1")
        .bind(season_id)
        .fetch_one(pool)
        .await?;

    let inventory: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items WHERE season_id = $1")
            .bind(season_id)
            .fetch_one(pool)
            .await?;

    let unassigned_inventory: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM inventory_items WHERE season_id = $1 AND assigned_to IS NULL",
    )
    .bind(season_id)
    .fetch_one(pool)
    .await?;

    let collected: Option<Decimal> = sqlx::query_scalar(
        "SELECT SUM(amount) FROM payments WHERE season_id = $1 AND status = 'succeeded'",
    )
    .bind(season_id)
    .fetch_one(pool)
    .await?;

    let pending: Option<Decimal> = sqlx::query_scalar(
        "SELECT SUM(amount) FROM payments WHERE season_id = $1 AND status = 'pending'",
    )
    .bind(season_id)
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::success(json!({
        "season": ctx.season,
        "members": members,
        "conflicts": conflicts,
        "inventory": {
            "total": inventory,
            "unassigned": unassigned_inventory,
        },
        "payments": {
            "collected": collected.unwrap_or(Decimal::ZERO),
            "pending": pending.unwrap_or(Decimal::ZERO),
        },
    })))
}
