use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, Claims};
use crate::config;
use crate::database::models::User;
use crate::database::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - verify credentials and issue a JWT
///
/// The token carries identity only; which season the user acts in, and
/// with which role, is resolved per request.
pub async fn login(Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, name, password_digest, created_at, updated_at, trashed_at, deleted_at
        FROM users
        WHERE email = $1 AND trashed_at IS NULL AND deleted_at IS NULL
        "#,
    )
    .bind(&payload.email)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !auth::verify_password(&payload.password, &user.password_digest) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let claims = Claims::new(user.id, user.email.clone(), user.name.clone());
    let token = auth::generate_jwt(claims).map_err(|e| {
        tracing::error!("token generation failed: {}", e);
        ApiError::internal_server_error("Failed to issue token")
    })?;

    let expires_in = config::config().security.jwt_expiry_hours * 3600;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
        },
        "expires_in": expires_in,
    })))
}
