//! Integration tests for Beanstall.
//!
//! The tests drive `beanstall-storefront` against [`FakeService`], an
//! in-process axum server that stands in for the menu/order service. It
//! records every request it receives and answers with whatever a test
//! configured for that method and path.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p beanstall-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `checkout` - Order submission, session reset, and cancellation
//! - `menu` - Catalog loading and menu mutations
//! - `history` - Order history lookup

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use beanstall_storefront::{ApiClient, ClientConfig, Session, services};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use uuid::Uuid;

pub use axum::http::Method;

/// Host prefix of URLs handed out for uploaded images.
pub const UPLOAD_HOST: &str = "http://images.test/uploads";

/// A request as the fake service saw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: Method,
    /// Path below `/api`, e.g. `/menu/3`.
    pub path: String,
    /// JSON body, a string for non-JSON text, `Null` when empty. Multipart
    /// uploads are summarized as `{field, fileName, contentType, size}`.
    pub body: Value,
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: String,
}

#[derive(Debug, Default)]
struct FakeState {
    canned: HashMap<(Method, String), Canned>,
    requests: Vec<Recorded>,
}

type Shared = Arc<Mutex<FakeState>>;

/// In-process stand-in for the menu/order service.
///
/// Unconfigured routes answer 404 with an empty body, except
/// `POST /upload/image`, which accepts any file and returns a fresh URL
/// under [`UPLOAD_HOST`].
pub struct FakeService {
    base_url: String,
    state: Shared,
    server: JoinHandle<()>,
}

impl FakeService {
    /// Bind an ephemeral port and start serving.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = Router::new()
            .route("/api/upload/image", post(upload))
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake service");
        let addr = listener.local_addr().expect("fake service address");
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake service crashed");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
            server,
        }
    }

    /// Base URL clients should be configured with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A storefront client pointed at this service.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let config = ClientConfig::for_api_url(&self.base_url).expect("valid fake service URL");
        ApiClient::new(&config).expect("build client")
    }

    /// Answer `method path` with a JSON body.
    pub fn respond_json(&self, method: Method, path: &str, status: u16, body: &Value) {
        self.set(method, path, status, "application/json", body.to_string());
    }

    /// Answer `method path` with a plain text body (may be empty).
    pub fn respond_text(&self, method: Method, path: &str, status: u16, body: &str) {
        self.set(method, path, status, "text/plain; charset=utf-8", body.to_owned());
    }

    /// Serve `entries` as the `GET /menu` listing.
    pub fn serve_menu(&self, entries: &Value) {
        self.respond_json(Method::GET, "/menu", 200, entries);
    }

    fn set(&self, method: Method, path: &str, status: u16, content_type: &'static str, body: String) {
        let status = StatusCode::from_u16(status).expect("valid status code");
        self.lock().canned.insert(
            (method, path.to_owned()),
            Canned {
                status,
                content_type,
                body,
            },
        );
    }

    /// Every request received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    /// Requests received for `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == *method && r.path == path)
            .cloned()
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake service state poisoned")
    }
}

impl Drop for FakeService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Strip the `/api` mount point.
fn api_path(uri: &Uri) -> String {
    let path = uri.path();
    path.strip_prefix("/api").unwrap_or(path).to_owned()
}

fn decode_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn canned_response(state: &Shared, method: &Method, path: &str) -> Option<Response> {
    let canned = state
        .lock()
        .expect("fake service state poisoned")
        .canned
        .get(&(method.clone(), path.to_owned()))
        .cloned()?;
    Some((canned.status, [(header::CONTENT_TYPE, canned.content_type)], canned.body).into_response())
}

async fn handle(State(state): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = api_path(&uri);
    state
        .lock()
        .expect("fake service state poisoned")
        .requests
        .push(Recorded {
            method: method.clone(),
            path: path.clone(),
            body: decode_body(&body),
        });

    canned_response(&state, &method, &path).unwrap_or_else(|| StatusCode::NOT_FOUND.into_response())
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut summary = Value::Null;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().unwrap_or_default().to_owned();
        let content_type = field.content_type().unwrap_or_default().to_owned();
        let size = field.bytes().await.map_or(0, |b| b.len());
        summary = json!({
            "field": name,
            "fileName": file_name,
            "contentType": content_type,
            "size": size,
        });
    }

    let file_name = summary
        .get("fileName")
        .and_then(Value::as_str)
        .unwrap_or("image")
        .to_owned();
    state
        .lock()
        .expect("fake service state poisoned")
        .requests
        .push(Recorded {
            method: Method::POST,
            path: "/upload/image".to_owned(),
            body: summary,
        });

    if let Some(response) = canned_response(&state, &Method::POST, "/upload/image") {
        return response;
    }
    let stored = format!("{}-{file_name}", Uuid::new_v4());
    (
        StatusCode::OK,
        axum::Json(json!({
            "imageUrl": format!("{UPLOAD_HOST}/{stored}"),
            "filename": stored,
            "originalFilename": file_name,
        })),
    )
        .into_response()
}

/// A service that accepts connections and never answers them.
///
/// Requests sent here hang until the caller gives up, which is how tests
/// cancel an operation mid-request.
pub struct SilentService {
    base_url: String,
    server: JoinHandle<()>,
}

impl SilentService {
    /// Bind an ephemeral port and start accepting.
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind silent service");
        let addr = listener.local_addr().expect("silent service address");
        let server = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        Self {
            base_url: format!("http://{addr}/api"),
            server,
        }
    }

    /// A storefront client pointed at this service.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        let config = ClientConfig::for_api_url(&self.base_url).expect("valid silent service URL");
        ApiClient::new(&config).expect("build client")
    }
}

impl Drop for SilentService {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// The three-item menu most tests start from.
#[must_use]
pub fn sample_menu() -> Value {
    json!([
        {"menuId": 1, "category": "Beans", "menuName": "Columbia Narino", "price": 5000, "imgUrl": ""},
        {"menuId": 2, "category": "Beans", "menuName": "Brazil Serra Do Caparao", "price": 6000},
        {"menuId": 3, "category": "Beans", "menuName": "Columbia Quintio", "price": 7000},
    ])
}

/// A session whose catalog was loaded from `service`.
pub async fn loaded_session(service: &FakeService, client: &ApiClient) -> Session {
    let mut session = Session::new();
    services::catalog::refresh(client, &mut session)
        .await
        .expect("initial catalog load");
    assert!(!service.requests_to(&Method::GET, "/menu").is_empty());
    session
}
