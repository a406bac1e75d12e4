use axum::{
    extract::Request,
    middleware,
    middleware::Next,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::access::Role;
use crate::handlers::{admin, coordinator, member, public, session};
use crate::middleware::auth::jwt_auth_middleware;
use crate::middleware::guard::require_role;
use crate::middleware::season::season_scope_middleware;

pub fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Authenticated, no role requirement (season selection surface)
        .merge(session_routes())
        // Season-scoped, one required role per group
        .merge(member_routes())
        .merge(coordinator_routes())
        .merge(admin_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Wrap a route group in the guard stack: authenticate, resolve the
/// season, then require exactly `role` in it. Layers run in that order,
/// and a denial at any step means the handler never executes.
pub fn season_scoped(routes: Router, role: Role) -> Router {
    routes
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            require_role(role, req, next)
        }))
        .route_layer(middleware::from_fn(season_scope_middleware))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn public_routes() -> Router {
    Router::new()
        .route("/auth/register", post(public::register))
        .route("/auth/login", post(public::login))
}

fn session_routes() -> Router {
    Router::new()
        .route("/api/session", get(session::whoami))
        .route("/api/session/seasons", get(session::my_seasons))
        .route("/api/session/season", put(session::select_season))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn member_routes() -> Router {
    let routes = Router::new()
        .route(
            "/api/conflicts",
            get(member::conflicts::list).post(member::conflicts::submit),
        )
        .route("/api/payments", get(member::payments::list))
        .route("/api/payments/intent", post(member::payments::create_intent))
        .route("/api/files", get(member::files::list));

    season_scoped(routes, Role::Member)
}

fn coordinator_routes() -> Router {
    let routes = Router::new()
        .route(
            "/api/inventory",
            get(coordinator::inventory::list).post(coordinator::inventory::add),
        )
        .route("/api/inventory/:id/assign", put(coordinator::inventory::assign))
        .route("/api/roster/conflicts", get(coordinator::conflicts::review));

    season_scoped(routes, Role::Coordinator)
}

fn admin_routes() -> Router {
    let routes = Router::new()
        .route("/api/admin/dashboard", get(admin::dashboard::show))
        .route("/api/admin/seasons", post(admin::seasons::create))
        .route(
            "/api/admin/roster",
            get(admin::roster::list).post(admin::roster::add),
        )
        .route(
            "/api/admin/roster/:user_id",
            put(admin::roster::set_role).delete(admin::roster::remove),
        );

    season_scoped(routes, Role::Admin)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Cadence API",
            "version": version,
            "description": "Membership management backend for a percussion ensemble",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "session": "/api/session[/seasons|/season] (authenticated)",
                "member": "/api/conflicts, /api/payments[/intent], /api/files (member role)",
                "coordinator": "/api/inventory[/:id/assign], /api/roster/conflicts (coordinator role)",
                "admin": "/api/admin/* (admin role)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
