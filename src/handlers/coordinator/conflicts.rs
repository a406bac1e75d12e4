use axum::extract::Extension;
use serde_json::{json, Value};
use sqlx::Row;

use crate::access::RequestContext;
use crate::database::DatabaseManager;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/roster/conflicts - every member conflict in the current season
///
/// The coordinator view joins member names so the schedule can be planned
/// without a second lookup.
pub async fn review(Extension(ctx): Extension<RequestContext>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let rows = sqlx::query(
        r#"
        SELECT c.id, c.user_id, u.name, u.email, c.starts_on, c.ends_on, c.reason, c.created_at
        FROM conflicts c
        JOIN users u ON u.id = c.user_id
        WHERE c.season_id = $1
        ORDER BY c.starts_on, u.name
        "#,
    )
    .bind(ctx.season.id)
    .fetch_all(pool)
    .await?;

    let conflicts: Vec<Value> = rows
        .iter()
        .map(|row| {
            json!({
                "id": row.get::<uuid::Uuid, _>("id"),
                "user_id": row.get::<uuid::Uuid, _>("user_id"),
                "member": {
                    "name": row.get::<String, _>("name"),
                    "email": row.get::<String, _>("email"),
                },
                "starts_on": row.get::<chrono::NaiveDate, _>("starts_on"),
                "ends_on": row.get::<chrono::NaiveDate, _>("ends_on"),
                "reason": row.get::<String, _>("reason"),
                "created_at": row.get::<chrono::DateTime<chrono::Utc>, _>("created_at"),
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({ "conflicts": conflicts })))
}
