//! Storefront pages rendered from a live admin API, plus failure handling
//! against a fake upstream.

#![allow(clippy::unwrap_used)]

use axum::{Router, http::StatusCode as AxumStatus};
use reqwest::StatusCode;
use serde_json::json;

use storeadmin_integration_tests::{
    TestAdmin, TestClient, id_of, product_body, seed_catalog, serve, spawn_storefront,
};

struct Shop {
    storefront: TestClient,
    category_id: String,
    size_id: String,
    featured_id: String,
    archived_id: String,
}

async fn shop() -> Shop {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("Main Street").await;
    let catalog = seed_catalog(&owner, &store).await;

    let featured = owner
        .create_ok(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Featured Tee", &json!("12.50"), true),
        )
        .await;
    owner
        .create_ok(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Plain Tee", &json!("9.00"), false),
        )
        .await;
    let mut retired = product_body(&catalog, "Retired Tee", &json!("5.00"), false);
    retired["isArchived"] = json!(true);
    let archived = owner
        .create_ok(&format!("/api/{store}/products"), &retired)
        .await;

    let api_url = format!("{}/api/{store}", admin.base_url);
    let storefront = spawn_storefront(&api_url, Some(&catalog.billboard_id)).await;

    Shop {
        storefront,
        category_id: catalog.category_id,
        size_id: catalog.size_id,
        featured_id: id_of(&featured),
        archived_id: id_of(&archived),
    }
}

#[tokio::test]
async fn test_home_shows_billboard_featured_and_nav() {
    let shop = shop().await;

    let response = shop.storefront.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let html = response.text().await.unwrap();
    assert!(html.contains("Summer Sale"));
    assert!(html.contains("Featured Tee"));
    assert!(!html.contains("Plain Tee"));
    assert!(html.contains(&format!("/category/{}", shop.category_id)));
}

#[tokio::test]
async fn test_category_lists_and_filters_products() {
    let shop = shop().await;

    let page = shop
        .storefront
        .get(&format!("/category/{}", shop.category_id))
        .await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("Featured Tee"));
    assert!(html.contains("Plain Tee"));
    assert!(html.contains("Large"));

    let same_size = shop
        .storefront
        .get(&format!("/category/{}?sizeId={}", shop.category_id, shop.size_id))
        .await;
    assert!(same_size.text().await.unwrap().contains("Plain Tee"));

    let other_size = shop
        .storefront
        .get(&format!(
            "/category/{}?sizeId=00000000-0000-4000-8000-000000000000",
            shop.category_id
        ))
        .await;
    assert_eq!(other_size.status(), StatusCode::OK);
    assert!(other_size.text().await.unwrap().contains("No results found."));
}

#[tokio::test]
async fn test_product_page_with_related_items() {
    let shop = shop().await;

    let page = shop
        .storefront
        .get(&format!("/product/{}", shop.featured_id))
        .await;
    assert_eq!(page.status(), StatusCode::OK);
    let html = page.text().await.unwrap();
    assert!(html.contains("Featured Tee"));
    assert!(html.contains("$12.50"));
    assert!(html.contains("Black"));
    // Related items come from the same category
    assert!(html.contains("Plain Tee"));
    assert!(!html.contains("Retired Tee"));
}

#[tokio::test]
async fn test_archived_product_renders_not_found() {
    let shop = shop().await;

    let response = shop
        .storefront
        .get(&format!("/product/{}", shop.archived_id))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let html = response.text().await.unwrap();
    assert!(!html.contains("Retired Tee"));
}

#[tokio::test]
async fn test_unknown_ids_render_not_found() {
    let shop = shop().await;

    for path in [
        "/product/00000000-0000-4000-8000-000000000000".to_string(),
        "/product/not-a-uuid".to_string(),
        "/category/00000000-0000-4000-8000-000000000000".to_string(),
        "/no/such/page".to_string(),
    ] {
        let response = shop.storefront.get(&path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn test_upstream_failure_renders_bad_gateway() {
    let broken = Router::new().fallback(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") });
    let api = serve(broken).await;
    let storefront = spawn_storefront(&format!("{api}/api/store"), None).await;

    let page = storefront.get("/").await;
    assert_eq!(page.status(), StatusCode::BAD_GATEWAY);
    let html = page.text().await.unwrap();
    assert!(html.contains("temporarily unavailable"));
    assert!(!html.contains("boom"));

    let ready = storefront.get("/health/ready").await;
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);

    let live = storefront.get("/health").await;
    assert_eq!(live.status(), StatusCode::OK);
}
