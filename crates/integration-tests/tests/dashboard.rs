//! Owner dashboard flows over HTTP: sign in, create a store, manage a
//! resource, sign out.

#![allow(clippy::unwrap_used)]

use reqwest::{Response, StatusCode};

use storeadmin_integration_tests::{PASSWORD, TestAdmin};

fn location(response: &Response) -> &str {
    response.headers()["location"].to_str().unwrap()
}

#[tokio::test]
async fn test_anonymous_pages_redirect_to_login() {
    let admin = TestAdmin::spawn().await;
    let browser = admin.browser();

    for path in ["/", "/stores/new", "/00000000-0000-4000-8000-000000000000/sizes"] {
        let response = browser.get(path).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&response), "/auth/login", "{path}");
    }

    let login = browser.get("/auth/login").await;
    assert_eq!(login.status(), StatusCode::OK);
    assert!(login.text().await.unwrap().contains("Sign in"));
}

#[tokio::test]
async fn test_wrong_password_rerenders_login() {
    let admin = TestAdmin::spawn().await;
    admin.client().register("owner@example.com").await;

    let browser = admin.browser();
    let response = browser
        .post_form(
            "/auth/login",
            &[("email", "owner@example.com"), ("password", "not the password")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("owner@example.com"));
}

#[tokio::test]
async fn test_sign_in_create_store_and_manage_sizes() {
    let admin = TestAdmin::spawn().await;
    admin.client().register("owner@example.com").await;
    let browser = admin.browser();

    let login = browser
        .post_form(
            "/auth/login",
            &[("email", "owner@example.com"), ("password", PASSWORD)],
        )
        .await;
    assert_eq!(login.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&login), "/");

    // No stores yet: the create-store form
    let home = browser.get("/").await;
    assert_eq!(home.status(), StatusCode::OK);
    assert!(home.text().await.unwrap().contains("Create store"));

    let created = browser.post_form("/stores", &[("name", "Main Street")]).await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    let store_path = location(&created).to_string();

    let home = browser.get("/").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&home), store_path);

    let overview = browser.get(&store_path).await;
    assert_eq!(overview.status(), StatusCode::OK);
    assert!(overview.text().await.unwrap().contains("Main Street"));

    // Blank name stays on the form
    let invalid = browser
        .post_form(&format!("{store_path}/sizes"), &[("name", ""), ("value", "L")])
        .await;
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let saved = browser
        .post_form(&format!("{store_path}/sizes"), &[("name", "Large"), ("value", "L")])
        .await;
    assert_eq!(saved.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&saved), format!("{store_path}/sizes"));

    let list = browser.get(&format!("{store_path}/sizes")).await;
    assert_eq!(list.status(), StatusCode::OK);
    let html = list.text().await.unwrap();
    assert!(html.contains("Large"));
    assert!(html.contains("Size created."));

    let logout = browser.post_form("/auth/logout", &[]).await;
    assert_eq!(logout.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&logout), "/auth/login");

    let after = browser.get(&store_path).await;
    assert_eq!(after.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&after), "/auth/login");
}

#[tokio::test]
async fn test_foreign_store_page_is_forbidden() {
    let admin = TestAdmin::spawn().await;
    let other = admin.client();
    other.register("other@example.com").await;
    let foreign = other.create_store("Not Yours").await;

    admin.client().register("owner@example.com").await;
    let browser = admin.browser();
    browser
        .post_form(
            "/auth/login",
            &[("email", "owner@example.com"), ("password", PASSWORD)],
        )
        .await;

    let response = browser.get(&format!("/{foreign}/billboards")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
