//! Integration test harness for the store admin and storefront.
//!
//! Servers are spawned in process on `127.0.0.1:0`:
//! - the admin on the in-memory catalog backend with in-memory sessions
//! - the storefront pointed at a spawned admin, or at any fake API router
//!
//! No database or external service is needed.
//!
//! ```rust,ignore
//! let admin = TestAdmin::spawn().await;
//! let owner = admin.client();
//! owner.register("owner@example.com").await;
//! let store_id = owner.create_store("Main Street").await;
//! ```

#![allow(clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use reqwest::{Client, Response, StatusCode, redirect};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

use storeadmin_admin::config::AdminConfig;
use storeadmin_admin::db::MemoryCatalogStore;
use storeadmin_admin::middleware::create_session_layer;
use storeadmin_storefront::config::StorefrontConfig;

/// Password used for every registered test owner.
pub const PASSWORD: &str = "correct horse battery";

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr: SocketAddr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server error");
    });

    format!("http://{addr}")
}

// =============================================================================
// Admin
// =============================================================================

/// An admin server running on the in-memory backend.
pub struct TestAdmin {
    pub base_url: String,
}

impl TestAdmin {
    /// Spawn a fresh admin with empty storage.
    pub async fn spawn() -> Self {
        let config = AdminConfig::from_vars(|key| {
            (key == "ADMIN_DATABASE_URL").then(|| "postgres://unused/test".to_string())
        })
        .expect("Failed to build admin config");

        let session_layer = create_session_layer(MemoryStore::default(), &config);
        let state = storeadmin_admin::state::AppState::new(
            config,
            Arc::new(MemoryCatalogStore::new()),
        );
        let app = storeadmin_admin::app(state).layer(session_layer);

        Self {
            base_url: serve(app).await,
        }
    }

    /// A client with its own cookie jar (one principal per client).
    #[must_use]
    pub fn client(&self) -> TestClient {
        TestClient::new(&self.base_url, true)
    }

    /// A cookie-keeping client that reports redirects instead of following them.
    #[must_use]
    pub fn browser(&self) -> TestClient {
        TestClient::new(&self.base_url, false)
    }
}

/// Cookie-enabled HTTP client bound to one server.
pub struct TestClient {
    pub base_url: String,
    pub http: Client,
}

impl TestClient {
    fn new(base_url: &str, follow_redirects: bool) -> Self {
        let policy = if follow_redirects {
            redirect::Policy::default()
        } else {
            redirect::Policy::none()
        };
        let http = Client::builder()
            .cookie_store(true)
            .redirect(policy)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.to_string(),
            http,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.http
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Response {
        self.http
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("PATCH failed")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.http
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE failed")
    }

    pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Response {
        let form: HashMap<&str, &str> = fields.iter().copied().collect();
        self.http
            .post(self.url(path))
            .form(&form)
            .send()
            .await
            .expect("POST form failed")
    }

    /// Register an owner and keep the session cookie.
    pub async fn register(&self, email: &str) -> Value {
        let response = self
            .post_json(
                "/api/auth/register",
                &json!({ "email": email, "name": "Test Owner", "password": PASSWORD }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK, "register {email}");
        response.json().await.expect("register body")
    }

    /// Create a store and return its id.
    pub async fn create_store(&self, name: &str) -> String {
        let store = self.create_ok("/api/stores", &json!({ "name": name })).await;
        id_of(&store)
    }

    /// POST a JSON body that must succeed and return the created row.
    pub async fn create_ok(&self, path: &str, body: &Value) -> Value {
        let response = self.post_json(path, body).await;
        let status = response.status();
        let value: Value = response.json().await.expect("create body");
        assert_eq!(status, StatusCode::OK, "POST {path}: {value}");
        value
    }

    /// GET a JSON body that must succeed.
    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        response.json().await.expect("JSON body")
    }
}

/// The `id` field of a JSON row.
#[must_use]
pub fn id_of(row: &Value) -> String {
    row["id"].as_str().expect("row without id").to_string()
}

/// Ids of one seeded catalog.
pub struct Catalog {
    pub billboard_id: String,
    pub category_id: String,
    pub size_id: String,
    pub color_id: String,
}

/// Create a billboard, category, size and color in `store_id`.
pub async fn seed_catalog(client: &TestClient, store_id: &str) -> Catalog {
    let billboard = client
        .create_ok(
            &format!("/api/{store_id}/billboards"),
            &json!({ "label": "Summer Sale", "imageUrl": "https://img.test/summer.jpg" }),
        )
        .await;
    let category = client
        .create_ok(
            &format!("/api/{store_id}/categories"),
            &json!({ "name": "Shirts", "billboardId": id_of(&billboard) }),
        )
        .await;
    let size = client
        .create_ok(
            &format!("/api/{store_id}/sizes"),
            &json!({ "name": "Large", "value": "L" }),
        )
        .await;
    let color = client
        .create_ok(
            &format!("/api/{store_id}/colors"),
            &json!({ "name": "Black", "value": "#000000" }),
        )
        .await;

    Catalog {
        billboard_id: id_of(&billboard),
        category_id: id_of(&category),
        size_id: id_of(&size),
        color_id: id_of(&color),
    }
}

/// A product body for `catalog` with the given name and price.
#[must_use]
pub fn product_body(catalog: &Catalog, name: &str, price: &Value, featured: bool) -> Value {
    json!({
        "name": name,
        "price": price,
        "categoryId": catalog.category_id,
        "sizeId": catalog.size_id,
        "colorId": catalog.color_id,
        "images": [{ "url": format!("https://img.test/{}.jpg", name.to_lowercase().replace(' ', "-")) }],
        "isFeatured": featured,
        "isArchived": false,
    })
}

// =============================================================================
// Storefront
// =============================================================================

/// Spawn a storefront reading from `api_url`, with caching disabled.
pub async fn spawn_storefront(api_url: &str, home_billboard_id: Option<&str>) -> TestClient {
    let mut vars = HashMap::from([
        ("STOREFRONT_API_URL", api_url.to_string()),
        ("STOREFRONT_CACHE_TTL_SECS", "0".to_string()),
    ]);
    if let Some(id) = home_billboard_id {
        vars.insert("STOREFRONT_HOME_BILLBOARD_ID", id.to_string());
    }

    let config = StorefrontConfig::from_vars(|key| vars.get(key).cloned())
        .expect("Failed to build storefront config");
    let state =
        storeadmin_storefront::state::AppState::new(config).expect("Failed to build storefront");
    let base_url = serve(storeadmin_storefront::app(state)).await;

    TestClient::new(&base_url, true)
}
