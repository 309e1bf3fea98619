//! Integration test harness for Cafe Catalog.
//!
//! Each test gets its own in-process site bound to an ephemeral port, backed
//! by an in-memory account store, an in-memory session store and a fake cafe
//! API that records every request it receives. No database or network access
//! is needed.
//!
//! ```bash
//! cargo test -p cafe-catalog-integration-tests
//! ```

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use reqwest::{Client, redirect};
use serde_json::{Value, json};
use tower_sessions::MemoryStore;

use cafe_catalog_web::config::AppConfig;
use cafe_catalog_web::db::MemoryUserStore;
use cafe_catalog_web::middleware::csrf::CSRF_FIELD;
use cafe_catalog_web::state::AppState;

/// Shared secret the site is configured to send to the fake API.
pub const TEST_API_KEY: &str = "12345678";

/// Session secret used by every test site.
const TEST_SESSION_SECRET: &str = "kT9vQ2mX7pL4wR8zN3bF6hJ1cY5dG0sA";

// =============================================================================
// Fake cafe API
// =============================================================================

/// One request as seen by the fake cafe API.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub api_key: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    /// Decoded `application/x-www-form-urlencoded` body.
    #[must_use]
    pub fn form(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(self.body.as_bytes())
            .into_owned()
            .collect()
    }
}

#[derive(Debug)]
struct FakeCatalogState {
    requests: Mutex<Vec<RecordedRequest>>,
    status: Mutex<StatusCode>,
    cafes: Mutex<Value>,
}

/// In-process stand-in for the remote cafe API.
#[derive(Debug, Clone)]
pub struct FakeCatalog {
    addr: SocketAddr,
    state: Arc<FakeCatalogState>,
}

impl FakeCatalog {
    /// Start the fake API on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeCatalogState {
            requests: Mutex::new(Vec::new()),
            status: Mutex::new(StatusCode::OK),
            cafes: Mutex::new(json!([])),
        });

        let app = Router::new()
            .fallback(record_request)
            .with_state(state.clone());
        let addr = serve(app).await;

        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Status every subsequent request is answered with.
    pub fn respond_with(&self, status: StatusCode) {
        *self.state.status.lock().unwrap() = status;
    }

    /// Body returned by `GET /all`.
    pub fn set_cafes(&self, cafes: Value) {
        *self.state.cafes.lock().unwrap() = cafes;
    }

    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn record_request(
    State(state): State<Arc<FakeCatalogState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        api_key: headers
            .get("s")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    state.requests.lock().unwrap().push(request);

    let status = *state.status.lock().unwrap();
    if !status.is_success() {
        return (status, Json(json!({"error": {"Not Found": "nope"}}))).into_response();
    }

    if method == Method::GET && uri.path() == "/all" {
        let cafes = state.cafes.lock().unwrap().clone();
        return Json(cafes).into_response();
    }

    Json(json!({"response": {"success": "ok"}})).into_response()
}

// =============================================================================
// Site under test
// =============================================================================

/// A running site plus its collaborators.
pub struct TestApp {
    pub addr: SocketAddr,
    pub catalog: FakeCatalog,
    pub users: Arc<MemoryUserStore>,
}

impl TestApp {
    /// Start a fresh site wired to a fresh fake API.
    pub async fn spawn() -> Self {
        let catalog = FakeCatalog::start().await;
        let catalog_url = catalog.base_url();

        let config = AppConfig::from_lookup(|key| match key {
            "CAFE_DATABASE_URL" => Some("postgres://unused/test".to_string()),
            "CAFE_SESSION_SECRET" => Some(TEST_SESSION_SECRET.to_string()),
            "CAFE_API_KEY" => Some(TEST_API_KEY.to_string()),
            "CAFE_API_BASE_URL" => Some(catalog_url.clone()),
            "CAFE_BASE_URL" => Some("http://127.0.0.1".to_string()),
            _ => None,
        })
        .expect("test configuration is valid");

        let users = Arc::new(MemoryUserStore::new());
        let state = AppState::new(config, users.clone()).expect("state builds");
        let app = cafe_catalog_web::build_router(state, MemoryStore::default());
        let addr = serve(app).await;

        Self {
            addr,
            catalog,
            users,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// A browser-like client: keeps cookies, does not follow redirects.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Fetch `page` and pull the CSRF token out of its form.
    pub async fn csrf_token(&self, client: &Client, page: &str) -> String {
        let html = client
            .get(self.url(page))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        extract_csrf_token(&html).unwrap_or_else(|| panic!("no csrf token on {page}"))
    }

    /// Submit the registration form.
    pub async fn register(&self, client: &Client, email: &str, password: &str) -> reqwest::Response {
        let token = self.csrf_token(client, "/register").await;
        client
            .post(self.url("/register"))
            .form(&[("email", email), ("password", password), (CSRF_FIELD, &token)])
            .send()
            .await
            .unwrap()
    }

    /// Submit the login form.
    pub async fn login(&self, client: &Client, email: &str, password: &str) -> reqwest::Response {
        let token = self.csrf_token(client, "/login").await;
        client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password), (CSRF_FIELD, &token)])
            .send()
            .await
            .unwrap()
    }

    /// A client holding the session of a freshly registered user.
    pub async fn logged_in_client(&self, email: &str) -> Client {
        let client = self.client();
        let response = self.register(&client, email, "correct horse").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        client
    }
}

/// Location header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Value of the hidden `csrf_token` input in a rendered page.
#[must_use]
pub fn extract_csrf_token(html: &str) -> Option<String> {
    let marker = format!(r#"name="{CSRF_FIELD}" value=""#);
    let start = html.find(&marker)? + marker.len();
    let end = html[start..].find('"')?;
    Some(html[start..start + end].to_string())
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server runs");
    });
    addr
}
