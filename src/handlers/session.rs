use axum::{
    extract::Extension,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::access::{resolve_season, MembershipDirectory, SeasonResolveError};
use crate::auth::AuthUser;
use crate::database::{DatabaseManager, MembershipStore};
use crate::error::ApiError;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::middleware::season::{append_season_cookie, selected_season};

/// GET /api/session - current user, resolved season, and role held there
///
/// Unlike the role-gated routes, a user with no memberships is not turned
/// away here; they see `season: null` and can ask an admin for access.
pub async fn whoami(Extension(user): Extension<AuthUser>, headers: HeaderMap) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    let season = match resolve_season(&store, user.user_id, selected_season(&headers)).await {
        Ok((season, _)) => Some(season),
        Err(SeasonResolveError::NoSeasonAvailable) => None,
        Err(SeasonResolveError::Directory(e)) => {
            tracing::error!("season resolution failed: {}", e);
            return Err(ApiError::internal_server_error(
                "An error occurred while processing your request",
            ));
        }
    };

    let role = match &season {
        Some(season) => store
            .role_of(user.user_id, season.id)
            .await
            .map_err(|e| {
                tracing::error!("role lookup failed: {}", e);
                ApiError::internal_server_error("An error occurred while processing your request")
            })?,
        None => None,
    };

    Ok(ApiResponse::success(json!({
        "user": {
            "id": user.user_id,
            "email": user.email,
            "name": user.name,
        },
        "season": season,
        "role": role,
    })))
}

/// GET /api/session/seasons - every season the user belongs to, with roles
pub async fn my_seasons(Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    let seasons = store.seasons_for(user.user_id).await?;
    let data: Vec<Value> = seasons
        .into_iter()
        .map(|(season, role)| json!({ "season": season, "role": role }))
        .collect();

    Ok(ApiResponse::success(json!({ "seasons": data })))
}

#[derive(Debug, Deserialize)]
pub struct SelectSeasonRequest {
    pub season_id: Uuid,
}

/// PUT /api/session/season - pin the session to a season
///
/// Explicit user choice overwrites whatever the cookie held. Membership in
/// the target season is not required; the guard on season-scoped routes
/// makes the final call either way.
pub async fn select_season(
    Extension(_user): Extension<AuthUser>,
    Json(payload): Json<SelectSeasonRequest>,
) -> Result<Response, ApiError> {
    let pool = DatabaseManager::pool().await?;
    let store = MembershipStore::new(pool.clone());

    let season = store
        .season_by_id(payload.season_id)
        .await
        .map_err(|e| {
            tracing::error!("season lookup failed: {}", e);
            ApiError::internal_server_error("An error occurred while processing your request")
        })?
        .ok_or_else(|| ApiError::not_found("Season not found"))?;

    let mut response = ApiResponse::success(json!({ "season": season })).into_response();
    append_season_cookie(&mut response, season.id);
    Ok(response)
}
