mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{TestServer, ADMIN_KEY, READ_KEY, WRITE_KEY};

#[tokio::test]
async fn insecure_requests_are_forbidden_even_with_valid_keys() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .insecure(Method::GET, "/api/items")
        .header("authorization", ADMIN_KEY)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn missing_or_insufficient_keys_are_unauthorized() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.secure(Method::GET, "/api/items").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .secure(Method::POST, "/api/items")
        .header("authorization", READ_KEY)
        .json(&json!({ "name": "widget" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Nothing was created by the rejected call
    let res = server
        .secure(Method::GET, "/api/items")
        .header("authorization", READ_KEY)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert_eq!(body["content"], json!([]));
    Ok(())
}

#[tokio::test]
async fn create_then_read_back_with_endpoint_listing() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .secure(Method::POST, "/api/items")
        .header("authorization", WRITE_KEY)
        .json(&json!({ "name": "widget", "quantity": 3 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let created = res.json::<Value>().await?;
    assert_eq!(created["content"]["attributes"]["name"], "widget");
    let id = created["content"]["id"].as_str().unwrap_or_default().to_string();

    let res = server
        .secure(Method::GET, &format!("/api/items/{}", id))
        .header("authorization", READ_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["content"]["id"], id.as_str());

    let items = body["endpointItems"].as_array().cloned().unwrap_or_default();
    assert_eq!(items[0]["fullPath"], format!("{}/api", server.secure_authority()));
    assert!(items.iter().any(|e| e["fullPath"] == "/health"));
    assert!(items
        .iter()
        .any(|e| e["httpMethod"] == "POST" && e["requiredModelName"] == "ItemModel"));
    Ok(())
}

#[tokio::test]
async fn include_endpoints_toggle_suppresses_listing() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .secure(Method::GET, "/api/items?includeEndpoints=FALSE")
        .header("authorization", READ_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["endpointItems"], json!([]));

    let res = server
        .secure(Method::GET, "/api/items?includeEndpoints=true")
        .header("authorization", READ_KEY)
        .send()
        .await?;
    let body = res.json::<Value>().await?;
    assert!(!body["endpointItems"].as_array().cloned().unwrap_or_default().is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_input_is_a_bad_request() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .secure(Method::POST, "/api/items")
        .header("authorization", WRITE_KEY)
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .secure(Method::GET, "/api/items/not-a-uuid")
        .header("authorization", READ_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn delete_requires_every_declared_level() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .secure(Method::POST, "/api/items")
        .header("authorization", WRITE_KEY)
        .json(&json!({ "name": "doomed" }))
        .send()
        .await?;
    let created = res.json::<Value>().await?;
    let path = format!("/api/items/{}", created["content"]["id"].as_str().unwrap_or_default());

    let res = server
        .secure(Method::DELETE, &path)
        .header("authorization", WRITE_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .secure(Method::DELETE, &path)
        .header("authorization", ADMIN_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body.get("content").is_none());
    Ok(())
}

#[tokio::test]
async fn admin_stats_reflect_created_items() -> Result<()> {
    let server = TestServer::spawn().await?;

    for (name, quantity) in [("a", 2), ("b", 5)] {
        server
            .secure(Method::POST, "/api/items")
            .header("authorization", WRITE_KEY)
            .json(&json!({ "name": name, "quantity": quantity }))
            .send()
            .await?;
    }

    let res = server
        .secure(Method::GET, "/admin/stats")
        .header("authorization", ADMIN_KEY)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["content"]["attributes"]["count"], 2);
    assert_eq!(body["content"]["attributes"]["total_quantity"], 7);
    Ok(())
}
