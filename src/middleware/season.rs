use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::access::{resolve_season, AccessDenied, RequestContext, SeasonResolveError};
use crate::auth::AuthUser;
use crate::config;
use crate::database::{DatabaseManager, MembershipStore};
use crate::error::ApiError;
use crate::middleware::guard::deny;

/// Season-context middleware. Reads the season selection cookie, resolves
/// the active season (falling back to the user's most recent membership),
/// and injects `RequestContext` for the guard and handlers. When the
/// resolution defaulted, the choice is written back as a cookie so later
/// requests in the session see the same season.
pub async fn season_scope_middleware(mut request: Request, next: Next) -> Result<Response, Response> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| deny(AccessDenied::Unauthenticated))?;

    let selection = selected_season(request.headers());

    let pool = DatabaseManager::pool().await.map_err(|e| {
        let api_error: ApiError = e.into();
        api_error.into_response()
    })?;
    let store = MembershipStore::new(pool.clone());

    let (season, newly_selected) = match resolve_season(&store, auth_user.user_id, selection).await {
        Ok(resolved) => resolved,
        Err(SeasonResolveError::NoSeasonAvailable) => {
            tracing::warn!(user = %auth_user.email, "no season membership");
            return Err(deny(AccessDenied::NoSeasonAvailable));
        }
        Err(SeasonResolveError::Directory(e)) => {
            tracing::error!("season resolution failed: {}", e);
            return Err(
                ApiError::internal_server_error("An error occurred while processing your request")
                    .into_response(),
            );
        }
    };

    let season_id = season.id;
    request.extensions_mut().insert(RequestContext { user: auth_user, season });

    let mut response = next.run(request).await;

    if newly_selected {
        append_season_cookie(&mut response, season_id);
    }

    Ok(response)
}

/// Parse the season selection out of the Cookie header, if present and
/// well-formed. Anything unparseable counts as "no selection".
pub fn selected_season(headers: &HeaderMap) -> Option<Uuid> {
    let cookie_name = &config::config().security.season_cookie;
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            let name = parts.next()?;
            let value = parts.next()?;
            if name == cookie_name {
                Uuid::parse_str(value).ok()
            } else {
                None
            }
        })
}

/// Set-Cookie for the season selection. Session-scoped: no Max-Age, so the
/// selection dies with the browser session.
pub fn append_season_cookie(response: &mut Response, season_id: Uuid) {
    let cookie_name = &config::config().security.season_cookie;
    let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", cookie_name, season_id);
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_selection_from_cookie_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("other=1; cadence_season={}; theme=dark", id)).unwrap(),
        );
        assert_eq!(selected_season(&headers), Some(id));
    }

    #[test]
    fn missing_or_malformed_cookie_means_no_selection() {
        let headers = HeaderMap::new();
        assert_eq!(selected_season(&headers), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("cadence_season=not-a-uuid"));
        assert_eq!(selected_season(&headers), None);
    }
}
