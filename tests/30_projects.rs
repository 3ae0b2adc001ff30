mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn project_crud_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();
    let name = format!("CRUD flow {}", common::unique_suffix());

    // Create
    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .json(&json!({ "name": name, "description": "round trip" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true, "missing envelope: {}", body);
    let id = body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["data"]["name"], name.as_str());
    let created_at = body["data"]["created_at"].as_str().expect("created_at").to_string();

    // Read back
    let res = client
        .get(format!("{}/api/projects/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["id"], id.as_str());
    assert_eq!(body["data"]["description"], "round trip");

    // Newest-first ordering puts the fresh project on page one
    let res = client
        .get(format!("{}/api/projects", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let items = body["data"]["items"].as_array().expect("items");
    assert!(
        items.iter().any(|p| p["id"] == id.as_str()),
        "fresh project missing from first page: {}",
        body
    );
    assert!(body["data"]["total"].as_i64().unwrap_or(0) >= 1);

    // Full-replace update
    let new_name = format!("{} v2", name);
    let res = client
        .put(format!("{}/api/projects/{}", server.base_url, id))
        .json(&json!({ "name": new_name, "description": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["name"], new_name.as_str());
    assert!(body["data"]["description"].is_null(), "PUT should replace: {}", body);

    let updated_at = body["data"]["updated_at"].as_str().expect("updated_at");
    assert!(updated_at >= created_at.as_str(), "updated_at did not advance");

    // Delete
    let res = client
        .delete(format!("{}/api/projects/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty(), "204 must have no body");

    // Gone
    let res = client
        .get(format!("{}/api/projects/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], format!("project {} not found", id));

    // Deleting again is also 404
    let res = client
        .delete(format!("{}/api/projects/{}", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn blank_name_returns_field_errors() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .json(&json!({ "name": "   " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["name"], "name is required");
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_bad_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::api_client();

    let res = client
        .get(format!("{}/api/projects/not-a-uuid", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn fresh_project_overview_has_zero_counts() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .json(&json!({ "name": format!("Overview {}", common::unique_suffix()) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let id = body["data"]["id"].as_str().expect("id").to_string();

    let res = client
        .get(format!("{}/api/projects/{}/overview", server.base_url, id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["scenario_count"], 0);
    assert_eq!(body["data"]["asset_count"], 0);
    assert_eq!(body["data"]["document_count"], 0);

    // Cleanup
    client
        .delete(format!("{}/api/projects/{}", server.base_url, id))
        .send()
        .await?;
    Ok(())
}
