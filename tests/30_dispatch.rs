use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use cadence_api::access::Role;
use cadence_api::app::season_scoped;

static HITS: AtomicUsize = AtomicUsize::new(0);

async fn probe() -> &'static str {
    HITS.fetch_add(1, Ordering::SeqCst);
    "ok"
}

fn guarded_probe() -> Router {
    season_scoped(Router::new().route("/api/probe", get(probe)), Role::Member)
}

/// The guard is a hard precondition: on denial the handler body must never
/// run, which the hit counter makes observable.
#[tokio::test]
async fn denied_request_never_reaches_the_handler() {
    let app = guarded_probe();

    let response = app
        .oneshot(Request::builder().uri("/api/probe").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/login")
    );
    assert_eq!(HITS.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn garbage_token_is_rejected_before_the_handler() {
    let app = guarded_probe();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/probe")
                .header("Authorization", "Bearer bogus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(HITS.load(Ordering::SeqCst), 0);
}
