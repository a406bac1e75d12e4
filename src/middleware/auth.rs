use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::access::AccessDenied;
use crate::auth::{AuthUser, Claims};
use crate::config;
use crate::middleware::guard::deny;

/// Bearer-token middleware: validates the JWT and injects `AuthUser` for
/// the rest of the chain. Failures redirect to the login entry point; the
/// response never says whether the token was missing, malformed, or
/// expired.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = match extract_jwt_from_headers(&headers) {
        Ok(token) => token,
        Err(msg) => {
            tracing::debug!("authentication rejected: {}", msg);
            return Err(deny(AccessDenied::Unauthenticated));
        }
    };

    let claims = match validate_jwt(&token) {
        Ok(claims) => claims,
        Err(msg) => {
            tracing::debug!("authentication rejected: {}", msg);
            return Err(deny(AccessDenied::Unauthenticated));
        }
    };

    let auth_user = AuthUser::from(claims);
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}
