mod common;

use anyhow::Result;
use reqwest::{redirect, StatusCode};

fn no_redirect_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().redirect(redirect::Policy::none()).build()?)
}

/// Every role-gated route turns an unauthenticated request into the same
/// redirect, with no hint of which resources exist behind it.
#[tokio::test]
async fn unauthenticated_requests_redirect_to_login() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = no_redirect_client()?;

    for path in [
        "/api/session",
        "/api/conflicts",
        "/api/payments",
        "/api/files",
        "/api/inventory",
        "/api/roster/conflicts",
        "/api/admin/dashboard",
        "/api/admin/roster",
    ] {
        let res = client.get(format!("{}{}", server.base_url, path)).send().await?;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "unexpected status for {}", path);
        assert_eq!(
            res.headers().get("location").and_then(|v| v.to_str().ok()),
            Some("/login"),
            "unexpected redirect target for {}",
            path
        );
    }
    Ok(())
}

#[tokio::test]
async fn malformed_bearer_token_is_denied_the_same_way() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = no_redirect_client()?;

    let res = client
        .get(format!("{}/api/conflicts", server.base_url))
        .header("Authorization", "Bearer not.a.token")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        res.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/login")
    );
    Ok(())
}

#[tokio::test]
async fn public_routes_do_not_redirect() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = no_redirect_client()?;

    let res = client.get(format!("{}/", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}
