mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn plan_validation_and_round_trip() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    // Unknown billing period is refused up front
    let res = client
        .post(format!("{}/api/plans", server.base_url))
        .json(&json!({
            "name": "Weekly",
            "price": "9.99",
            "billing_period": "week",
            "max_projects": 1
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(
        body["field_errors"]["billing_period"],
        "billing_period must be one of: month, year"
    );

    // A valid plan goes through, price survives as exact decimal
    let res = client
        .post(format!("{}/api/plans", server.base_url))
        .json(&json!({
            "name": format!("Team {}", common::unique_suffix()),
            "description": "For small QA teams",
            "price": "29.00",
            "billing_period": "month",
            "max_projects": 25
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let plan_id = body["data"]["id"].as_str().expect("id").to_string();
    assert_eq!(body["data"]["price"], "29.00");
    assert_eq!(body["data"]["billing_period"], "month");

    let res = client
        .delete(format!("{}/api/plans/{}", server.base_url, plan_id))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn pages_are_addressable_by_slug_and_slugs_are_unique() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();
    let slug = format!("release-notes-{}", common::unique_suffix());

    let res = client
        .post(format!("{}/api/pages", server.base_url))
        .json(&json!({
            "slug": slug,
            "title": "Release notes",
            "content": "## 1.0\nFirst stable release."
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body = res.json::<serde_json::Value>().await?;
    let page_id = body["data"]["id"].as_str().expect("id").to_string();

    // Lookup by slug finds the same page
    let res = client
        .get(format!("{}/api/pages/slug/{}", server.base_url, slug))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["id"], page_id.as_str());

    // Second page with the same slug is refused
    let res = client
        .post(format!("{}/api/pages", server.base_url))
        .json(&json!({
            "slug": slug,
            "title": "Impostor",
            "content": "..."
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "CONFLICT");

    // But the page may keep its own slug across an update
    let res = client
        .put(format!("{}/api/pages/{}", server.base_url, page_id))
        .json(&json!({
            "slug": slug,
            "title": "Release notes",
            "content": "## 1.1\nBug fixes."
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Uppercase slugs never make it in
    let res = client
        .post(format!("{}/api/pages", server.base_url))
        .json(&json!({
            "slug": "Not-Valid",
            "title": "x",
            "content": "x"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Cleanup
    client
        .delete(format!("{}/api/pages/{}", server.base_url, page_id))
        .send()
        .await?;
    Ok(())
}

#[tokio::test]
async fn review_rating_filter_and_bounds() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();
    let author = format!("Reviewer {}", common::unique_suffix());

    for rating in [5, 3] {
        let res = client
            .post(format!("{}/api/reviews", server.base_url))
            .json(&json!({
                "author": author,
                "rating": rating,
                "content": "Solid tool."
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    // Out-of-scale rating is refused
    let res = client
        .post(format!("{}/api/reviews", server.base_url))
        .json(&json!({ "author": author, "rating": 6, "content": "!" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Filtered list only contains the requested rating
    let res = client
        .get(format!("{}/api/reviews?rating=5&page_size=100", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    let items = body["data"]["items"].as_array().expect("items");
    assert!(items.iter().all(|r| r["rating"] == 5));
    assert!(items.iter().any(|r| r["author"] == author.as_str()));

    // Nonsense filter value is a 400, not an empty list
    let res = client
        .get(format!("{}/api/reviews?rating=11", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

/// Next free version number for a versioned-content endpoint, so repeated
/// runs against the same database never collide.
async fn next_version(client: &reqwest::Client, current_url: &str) -> Result<i64> {
    let res = client.get(current_url).send().await?;
    if res.status() == StatusCode::NOT_FOUND {
        return Ok(1);
    }
    let body = res.json::<serde_json::Value>().await?;
    Ok(body["data"]["version"].as_i64().unwrap_or(0) + 1)
}

#[tokio::test]
async fn terms_current_tracks_the_highest_version() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let base = next_version(&client, &format!("{}/api/terms/current", server.base_url)).await?;

    for version in [base, base + 1] {
        let res = client
            .post(format!("{}/api/terms", server.base_url))
            .json(&json!({
                "version": version,
                "content": format!("Terms revision {}", version)
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!("{}/api/terms/current", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["version"], base + 1);

    // Re-publishing an existing version is refused
    let res = client
        .post(format!("{}/api/terms", server.base_url))
        .json(&json!({ "version": base, "content": "duplicate" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    Ok(())
}

#[tokio::test]
async fn privacy_policy_current_works_like_terms() -> Result<()> {
    let server = common::ensure_server().await?;
    if !common::database_ready(server).await? {
        return Ok(());
    }
    let client = common::api_client();

    let version = next_version(
        &client,
        &format!("{}/api/privacy-policies/current", server.base_url),
    )
    .await?;

    let res = client
        .post(format!("{}/api/privacy-policies", server.base_url))
        .json(&json!({
            "version": version,
            "content": "We store project data in the EU."
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client
        .get(format!("{}/api/privacy-policies/current", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["version"], version);

    Ok(())
}
