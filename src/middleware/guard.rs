use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::access::{authorize, AccessDenied, MembershipDirectory, RequestContext, Role};
use crate::config;
use crate::database::{DatabaseManager, MembershipStore};
use crate::error::ApiError;

/// Uniform denial response. Every denial reason redirects to the same
/// login destination so the response leaks neither the reason nor whether
/// the guarded resource exists.
pub fn deny(reason: AccessDenied) -> Response {
    tracing::warn!("access denied: {}", reason);
    Redirect::to(&config::config().security.login_path).into_response()
}

/// Role gate for a route group. Runs after `jwt_auth_middleware` and
/// `season_scope_middleware`; the guarded handler never executes unless the
/// user holds exactly `required` in the resolved season.
pub async fn require_role(required: Role, request: Request, next: Next) -> Result<Response, Response> {
    let ctx = request
        .extensions()
        .get::<RequestContext>()
        .cloned()
        .ok_or_else(|| deny(AccessDenied::Unauthenticated))?;

    let pool = DatabaseManager::pool().await.map_err(|e| {
        let api_error: ApiError = e.into();
        api_error.into_response()
    })?;
    let store = MembershipStore::new(pool.clone());

    let held = store.role_of(ctx.user.user_id, ctx.season.id).await.map_err(|e| {
        tracing::error!("role lookup failed: {}", e);
        ApiError::internal_server_error("An error occurred while processing your request").into_response()
    })?;

    if let Err(denied) = authorize(held, required) {
        tracing::warn!(
            user = %ctx.user.email,
            season = ctx.season.year,
            required = %required,
            held = held.map(|r| r.as_str()).unwrap_or("none"),
            "role check failed"
        );
        return Err(deny(denied));
    }

    Ok(next.run(request).await)
}
