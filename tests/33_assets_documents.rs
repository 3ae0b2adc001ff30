mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn asset_metadata_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .json(&json!({ "name": format!("Asset host {}", common::unique_suffix()) }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let project_id = body["data"]["id"].as_str().expect("id").to_string();

    let res = client
        .post(format!("{}/api/assets", server.base_url))
        .json(&json!({
            "project_id": project_id,
            "file_name": "checkout-trace.har",
            "url": "https://cdn.example.com/traces/checkout-trace.har",
            "content_type": "application/json",
            "size_bytes": 182_554
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let asset_id = body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["data"]["size_bytes"], 182_554);

    // Replace with a smaller re-export
    let res = client
        .put(format!("{}/api/assets/{}", server.base_url, asset_id))
        .json(&json!({
            "project_id": project_id,
            "file_name": "checkout-trace-trimmed.har",
            "url": "https://cdn.example.com/traces/checkout-trace-trimmed.har",
            "size_bytes": 90_000
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["file_name"], "checkout-trace-trimmed.har");
    assert!(body["data"]["content_type"].is_null(), "PUT should replace: {}", body);

    let res = client
        .delete(format!("{}/api/assets/{}", server.base_url, asset_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // Cleanup
    client
        .delete(format!("{}/api/projects/{}", server.base_url, project_id))
        .send()
        .await?;
    Ok(())
}

#[tokio::test]
async fn asset_url_must_parse() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let res = client
        .post(format!("{}/api/projects", server.base_url))
        .json(&json!({ "name": format!("Bad URL host {}", common::unique_suffix()) }))
        .send()
        .await?;
    let body = res.json::<serde_json::Value>().await?;
    let project_id = body["data"]["id"].as_str().expect("id").to_string();

    let res = client
        .post(format!("{}/api/assets", server.base_url))
        .json(&json!({
            "project_id": project_id,
            "file_name": "x.png",
            "url": "not a url at all"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["field_errors"]["url"], "url must be a valid URL");

    // Cleanup
    client
        .delete(format!("{}/api/projects/{}", server.base_url, project_id))
        .send()
        .await?;
    Ok(())
}

#[tokio::test]
async fn document_list_filters_by_project() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let mut project_ids = Vec::new();
    for n in 1..=2 {
        let res = client
            .post(format!("{}/api/projects", server.base_url))
            .json(&json!({ "name": format!("Doc host {} {}", n, common::unique_suffix()) }))
            .send()
            .await?;
        let body = res.json::<serde_json::Value>().await?;
        project_ids.push(body["data"]["id"].as_str().expect("id").to_string());
    }

    for (i, project_id) in project_ids.iter().enumerate() {
        let res = client
            .post(format!("{}/api/documents", server.base_url))
            .json(&json!({
                "project_id": project_id,
                "title": format!("Notes {}", i),
                "content": "..."
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!(
            "{}/api/documents?project_id={}",
            server.base_url, project_ids[0]
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(
        body["data"]["items"][0]["project_id"],
        project_ids[0].as_str()
    );

    // Cleanup
    for project_id in project_ids {
        client
            .delete(format!("{}/api/projects/{}", server.base_url, project_id))
            .send()
            .await?;
    }
    Ok(())
}

#[tokio::test]
async fn missing_required_field_is_unprocessable() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = common::api_client();

    // No "content" at all, so deserialization itself fails
    let res = client
        .post(format!("{}/api/documents", server.base_url))
        .json(&json!({ "project_id": uuid::Uuid::new_v4(), "title": "No body" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNPROCESSABLE_ENTITY");
    Ok(())
}
