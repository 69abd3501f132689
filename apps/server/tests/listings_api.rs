#[allow(unused)]
mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::{
    assert_status, bike, catalogue, error_fields, get_results, listing_payload, result_titles,
    TestApp,
};

async fn seeded_app() -> anyhow::Result<TestApp> {
    let app = TestApp::new();
    for payload in catalogue() {
        app.create_listing(&payload).await?;
    }
    Ok(app)
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_id_and_message() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api", &bike()).await?;

    assert_status(status, StatusCode::CREATED, "create");
    assert!(body["result"]["id"].is_string());
    assert_eq!(body["result"]["msg"], "Listing bike successfully created");
    Ok(())
}

#[tokio::test]
async fn create_normalizes_the_stored_listing() -> anyhow::Result<()> {
    let app = TestApp::new();
    let id = app.create_listing(&bike()).await?;

    let (status, body) = app.get_json("/api").await?;

    assert_status(status, StatusCode::OK, "search");
    assert_eq!(
        get_results(&body)?[0],
        json!({
            "id": id,
            "title": "bike",
            "forSale": true,
            "price": 150,
            "photoReference": "bike.png",
            "tags": ["motor"]
        })
    );
    Ok(())
}

#[tokio::test]
async fn create_accepts_form_bodies() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post_form(
            "/api",
            "title=Office+Chair&forSale=false&price=45.50&photoReference=chair.jpeg&tags=work&tags=lifestyle",
        )
        .await?;
    assert_status(status, StatusCode::CREATED, "form create");
    assert_eq!(
        body["result"]["msg"],
        "Listing office chair successfully created"
    );

    let (_, body) = app.get_json("/api?tag=lifestyle").await?;
    let results = get_results(&body)?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["price"], json!(45.5));
    assert_eq!(results[0]["tags"], json!(["lifestyle", "work"]));
    Ok(())
}

#[tokio::test]
async fn create_reports_every_invalid_field() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api",
            &json!({"title": "Lamp", "forSale": "perhaps", "photoReference": "lamp.gif"}),
        )
        .await?;

    assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "invalid create");
    assert_eq!(
        error_fields(&body)?,
        vec!["forSale", "price", "photoReference", "tags"]
    );
    Ok(())
}

#[tokio::test]
async fn create_rejects_tags_outside_the_enumeration() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api", &listing_payload("Rake", true, 5.0, &["garden"]))
        .await?;

    assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "unknown tag");
    assert_eq!(error_fields(&body)?, vec!["tags"]);

    let (_, body) = app.get_json("/api").await?;
    assert!(get_results(&body)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_rejects_malformed_json() -> anyhow::Result<()> {
    let app = TestApp::new();

    let (status, _headers, body) = app
        .request(Method::POST, "/api", Some("{\"title\":".into()))
        .await?;

    assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "malformed body");
    assert_eq!(error_fields(&serde_json::from_slice(&body)?)?, vec!["body"]);
    Ok(())
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_combines_price_tag_and_sort() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (status, body) = app
        .get_json("/api?price=100-200&tag=motor&sort=-price")
        .await?;

    assert_status(status, StatusCode::OK, "search");
    assert_eq!(
        result_titles(&body)?,
        vec!["racing bike", "mountain bike", "scooter", "helmet"]
    );
    Ok(())
}

#[tokio::test]
async fn inverted_price_range_returns_nothing() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (status, body) = app.get_json("/api?price=200-100").await?;

    assert_status(status, StatusCode::OK, "inverted range");
    assert!(get_results(&body)?.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_errors_are_aggregated() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (status, body) = app.get_json("/api?forSale=maybe&limit=abc").await?;

    assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "invalid search");
    assert_eq!(error_fields(&body)?, vec!["forSale", "limit"]);
    Ok(())
}

#[tokio::test]
async fn search_rejects_malformed_price_and_unknown_tag() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (status, body) = app.get_json("/api?price=1-2-3&tag=garden").await?;

    assert_status(status, StatusCode::UNPROCESSABLE_ENTITY, "invalid search");
    assert_eq!(error_fields(&body)?, vec!["tag", "price"]);
    Ok(())
}

#[tokio::test]
async fn search_matches_title_fragments_case_insensitively() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (_, body) = app.get_json("/api?item=BIKE&sort=item").await?;

    assert_eq!(result_titles(&body)?, vec!["mountain bike", "racing bike"]);
    Ok(())
}

#[tokio::test]
async fn search_pages_after_sorting() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (_, body) = app.get_json("/api?sort=item&skip=1&limit=2").await?;

    assert_eq!(result_titles(&body)?, vec!["helmet", "iphone"]);
    Ok(())
}

#[tokio::test]
async fn search_projects_requested_fields_plus_id() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (_, body) = app.get_json("/api?forSale=false&fields=title%20price").await?;

    let results = get_results(&body)?;
    assert_eq!(results.len(), 1);
    let object = results[0].as_object().expect("result is an object");
    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(keys, vec!["id", "price", "title"]);
    assert_eq!(object["title"], "iphone");
    Ok(())
}

#[tokio::test]
async fn repeated_searches_are_identical() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (_, first) = app.get_json("/api?tag=motor&sort=price").await?;
    let (_, second) = app.get_json("/api?tag=motor&sort=price").await?;

    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn trailing_slash_is_served() -> anyhow::Result<()> {
    let app = seeded_app().await?;

    let (status, body) = app.get_json("/api/?tag=work").await?;

    assert_status(status, StatusCode::OK, "trailing slash");
    assert_eq!(get_results(&body)?.len(), 2);
    Ok(())
}
