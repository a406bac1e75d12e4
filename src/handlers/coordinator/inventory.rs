use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::access::RequestContext;
use crate::database::models::InventoryItem;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

/// GET /api/inventory - all items tracked for the current season
pub async fn list(Extension(ctx): Extension<RequestContext>) -> ApiResult<Vec<InventoryItem>> {
    let pool = DatabaseManager::pool().await?;

    let items = sqlx::query_as::<_, InventoryItem>(
        r#"
        SELECT id, season_id, name, serial, assigned_to, created_at, updated_at
        FROM inventory_items
        WHERE season_id = $1
        ORDER BY name
        "#,
    )
    .bind(ctx.season.id)
    .fetch_all(pool)
    .await?;

    Ok(ApiResponse::success(items))
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub serial: Option<String>,
}

/// POST /api/inventory - track a new item for the current season
pub async fn add(
    Extension(ctx): Extension<RequestContext>,
    Json(payload): Json<AddItemRequest>,
) -> ApiResult<InventoryItem> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("An item name is required"));
    }

    let pool = DatabaseManager::pool().await?;

    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        INSERT INTO inventory_items (id, season_id, name, serial)
        VALUES ($1, $2, $3, $4)
        RETURNING id, season_id, name, serial, assigned_to, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(ctx.season.id)
    .bind(payload.name.trim())
    .bind(payload.serial.as_deref())
    .fetch_one(pool)
    .await?;

    Ok(ApiResponse::created(item))
}

#[derive(Debug, Deserialize)]
pub struct AssignItemRequest {
    /// None returns the item to storage.
    pub user_id: Option<Uuid>,
}

/// PUT /api/inventory/:id/assign - check an item out to a member (or back in)
pub async fn assign(
    Extension(ctx): Extension<RequestContext>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<AssignItemRequest>,
) -> ApiResult<InventoryItem> {
    let pool = DatabaseManager::pool().await?;

    let item = sqlx::query_as::<_, InventoryItem>(
        r#"
        UPDATE inventory_items
        SET assigned_to = $3, updated_at = now()
        WHERE id = $1 AND season_id = $2
        RETURNING id, season_id, name, serial, assigned_to, created_at, updated_at
        "#,
    )
    .bind(item_id)
    .bind(ctx.season.id)
    .bind(payload.user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Inventory item not found in this season"))?;

    Ok(ApiResponse::success(item))
}
