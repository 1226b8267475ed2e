//! Store-scoped resource API over HTTP.
//!
//! Each test spawns its own admin on the in-memory backend.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use storeadmin_integration_tests::{TestAdmin, id_of, product_body, seed_catalog};

#[tokio::test]
async fn test_create_in_foreign_store_is_forbidden_and_writes_nothing() {
    let admin = TestAdmin::spawn().await;
    let p = admin.client();
    let q = admin.client();
    p.register("p@example.com").await;
    q.register("q@example.com").await;
    let _s1 = p.create_store("S1").await;
    let s2 = q.create_store("S2").await;

    let response = p
        .post_json(
            &format!("/api/{s2}/billboards"),
            &json!({ "label": "Hijack", "imageUrl": "https://img.test/x.jpg" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "forbidden");

    let billboards = p.get_json(&format!("/api/{s2}/billboards")).await;
    assert_eq!(billboards, json!([]));
}

#[tokio::test]
async fn test_writes_require_a_session() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("Main").await;

    let anonymous = admin.client();
    let response = anonymous
        .post_json(
            &format!("/api/{store}/sizes"),
            &json!({ "name": "Large", "value": "L" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guard_answers_before_a_malformed_body() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    let stranger = admin.client();
    owner.register("owner@example.com").await;
    stranger.register("stranger@example.com").await;
    let store = owner.create_store("Main").await;
    let garbled = json!({ "name": ["Large"], "value": 7 });
    let path = format!("/api/{store}/sizes");

    let response = admin.client().post_json(&path, &garbled).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = stranger.post_json(&path, &garbled).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = stranger
        .patch_json(&format!("/api/stores/{store}"), &garbled)
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = owner.post_json(&path, &garbled).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_negative_price_is_rejected_on_price() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;
    let catalog = seed_catalog(&owner, &store).await;

    let response = owner
        .post_json(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Tee", &json!(-5), false),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_argument");
    assert_eq!(body["field"], "price");

    let products = owner.get_json(&format!("/api/{store}/products")).await;
    assert_eq!(products, json!([]));
}

#[tokio::test]
async fn test_missing_name_is_rejected_on_name() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;

    let response = owner
        .post_json(&format!("/api/{store}/sizes"), &json!({ "value": "L" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "name");
    assert_eq!(owner.get_json(&format!("/api/{store}/sizes")).await, json!([]));
}

#[tokio::test]
async fn test_null_field_is_rejected_on_that_field() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;

    let response = owner
        .post_json(
            &format!("/api/{store}/billboards"),
            &json!({ "label": null, "imageUrl": "https://img.test/x.jpg" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "invalid_argument");
    assert_eq!(body["field"], "label");
    assert_eq!(body["message"], "Label is required");
    assert_eq!(owner.get_json(&format!("/api/{store}/billboards")).await, json!([]));

    let catalog = seed_catalog(&owner, &store).await;
    let mut product = product_body(&catalog, "Tee", &json!("12.50"), false);
    product["categoryId"] = Value::Null;
    let response = owner
        .post_json(&format!("/api/{store}/products"), &product)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "categoryId");
}

#[tokio::test]
async fn test_created_size_is_listed() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;

    let created = owner
        .create_ok(
            &format!("/api/{store}/sizes"),
            &json!({ "name": "Large", "value": "L" }),
        )
        .await;

    let sizes = owner.get_json(&format!("/api/{store}/sizes")).await;
    let sizes = sizes.as_array().unwrap();
    assert_eq!(sizes.len(), 1);
    let size = sizes.first().unwrap();
    assert_eq!(size["id"], created["id"]);
    assert_eq!(size["name"], "Large");
    assert_eq!(size["value"], "L");
    assert_eq!(size["storeId"], store.as_str());
}

#[tokio::test]
async fn test_category_with_foreign_billboard_is_rejected_on_billboard_id() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let s1 = owner.create_store("S1").await;
    let s2 = owner.create_store("S2").await;
    let foreign = seed_catalog(&owner, &s2).await;

    let response = owner
        .post_json(
            &format!("/api/{s1}/categories"),
            &json!({ "name": "Shirts", "billboardId": foreign.billboard_id }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["field"], "billboardId");
    assert_eq!(owner.get_json(&format!("/api/{s1}/categories")).await, json!([]));
}

#[tokio::test]
async fn test_product_with_foreign_references_is_rejected_on_each_field() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let s1 = owner.create_store("S1").await;
    let s2 = owner.create_store("S2").await;
    let local = seed_catalog(&owner, &s1).await;
    let foreign = seed_catalog(&owner, &s2).await;

    for (field, foreign_id) in [
        ("categoryId", &foreign.category_id),
        ("sizeId", &foreign.size_id),
        ("colorId", &foreign.color_id),
    ] {
        let mut body = product_body(&local, "Tee", &json!("12.50"), false);
        body[field] = json!(foreign_id);

        let response = owner.post_json(&format!("/api/{s1}/products"), &body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
        let error: Value = response.json().await.unwrap();
        assert_eq!(error["error"], "invalid_argument");
        assert_eq!(error["field"], field);
    }

    assert_eq!(owner.get_json(&format!("/api/{s1}/products")).await, json!([]));
    assert_eq!(owner.get_json(&format!("/api/{s2}/products")).await, json!([]));
}

#[tokio::test]
async fn test_deleting_referenced_category_conflicts() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;
    let catalog = seed_catalog(&owner, &store).await;
    let product = owner
        .create_ok(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Tee", &json!("12.50"), false),
        )
        .await;

    let response = owner
        .delete(&format!("/api/{store}/categories/{}", catalog.category_id))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    owner
        .get_json(&format!("/api/{store}/categories/{}", catalog.category_id))
        .await;
    owner
        .get_json(&format!("/api/{store}/products/{}", id_of(&product)))
        .await;
}

#[tokio::test]
async fn test_repeated_update_is_idempotent() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;
    let color = owner
        .create_ok(
            &format!("/api/{store}/colors"),
            &json!({ "name": "Black", "value": "#000000" }),
        )
        .await;
    let path = format!("/api/{store}/colors/{}", id_of(&color));
    let update = json!({ "name": "Navy", "value": "#000080" });

    let first = owner.patch_json(&path, &update).await;
    assert_eq!(first.status(), StatusCode::OK);
    let after_first = owner.get_json(&path).await;

    let second = owner.patch_json(&path, &update).await;
    assert_eq!(second.status(), StatusCode::OK);
    let after_second = owner.get_json(&path).await;

    for key in ["id", "name", "value", "storeId", "createdAt"] {
        assert_eq!(after_first[key], after_second[key], "{key}");
    }
    assert_eq!(after_second["name"], "Navy");
}

#[tokio::test]
async fn test_unknown_and_malformed_ids() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;

    let missing = owner
        .get(&format!("/api/{store}/sizes/00000000-0000-4000-8000-000000000000"))
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = owner.get(&format!("/api/{store}/sizes/not-a-uuid")).await;
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_filter_by_featured() {
    let admin = TestAdmin::spawn().await;
    let owner = admin.client();
    owner.register("owner@example.com").await;
    let store = owner.create_store("S1").await;
    let catalog = seed_catalog(&owner, &store).await;
    owner
        .create_ok(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Featured Tee", &json!("20.00"), true),
        )
        .await;
    owner
        .create_ok(
            &format!("/api/{store}/products"),
            &product_body(&catalog, "Plain Tee", &json!("10.00"), false),
        )
        .await;

    let featured = owner
        .get_json(&format!("/api/{store}/products?isFeatured=true"))
        .await;
    let names: Vec<&str> = featured
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Featured Tee"]);
}
