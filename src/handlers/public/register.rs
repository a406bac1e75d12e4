use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::Row;
use uuid::Uuid;

use crate::auth;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// POST /auth/register - create a user account
///
/// Registration creates the identity only; season access comes later when
/// an admin adds the user to a roster.
pub async fn register(Json(payload): Json<RegisterRequest>) -> ApiResult<Value> {
    if !payload.email.contains('@') {
        return Err(ApiError::bad_request("A valid email address is required"));
    }
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("A display name is required"));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let pool = DatabaseManager::pool().await?;
    let digest = auth::password_digest(&payload.password);

    let row = sqlx::query(
        r#"
        INSERT INTO users (id, email, name, password_digest)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&payload.email)
    .bind(payload.name.trim())
    .bind(&digest)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if e.as_database_error().map_or(false, |d| d.is_unique_violation()) {
            ApiError::conflict("Email is already registered")
        } else {
            e.into()
        }
    })?;

    let id: Uuid = row.get("id");

    Ok(ApiResponse::created(json!({
        "id": id,
        "email": payload.email,
        "name": payload.name.trim(),
    })))
}
