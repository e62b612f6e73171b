// Mock AskMe backend for integration tests, served on an ephemeral port.
use askme_gateway::{GatewayConfig, HttpBackend, ToolGateway};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

// The mock rejects this address the way the real backend's `@Email` check would.
pub const REJECTED_EMAIL: &str = "rejected@example.com";

// Every request the mock receives, as "METHOD path" plus any JSON body.
#[derive(Clone, Default)]
pub struct Recorder {
    hits: Arc<Mutex<Vec<(String, Option<Value>)>>>,
}

impl Recorder {
    fn record(&self, route: &str, body: Option<Value>) {
        self.hits
            .lock()
            .expect("recorder mutex poisoned")
            .push((route.to_string(), body));
    }

    pub fn hits(&self) -> Vec<(String, Option<Value>)> {
        self.hits.lock().expect("recorder mutex poisoned").clone()
    }

    pub fn count(&self, route: &str) -> usize {
        self.hits().iter().filter(|(r, _)| r == route).count()
    }
}

async fn list_documents(State(rec): State<Recorder>) -> Json<Value> {
    rec.record("GET /check-unsigned-documents", None);
    Json(json!([
        {
            "id": "1",
            "title": "Contract A",
            "description": "Description for Contract A",
            "signed": false
        },
        {
            "id": "2",
            "title": "Contract B",
            "description": "Description for Contract B",
            "signed": false
        }
    ]))
}

async fn sign_document(
    State(rec): State<Recorder>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    rec.record("POST /sign-document", Some(json!(params)));
    let id = params.get("documentId").cloned().unwrap_or_default();

    if id == "1" || id == "2" {
        (StatusCode::OK, format!("Document {id} signed successfully!")).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "status": 404,
                "error": "Not Found",
                "message": format!("Document {id} not found")
            })),
        )
            .into_response()
    }
}

async fn create_guest(State(rec): State<Recorder>, Json(body): Json<Value>) -> Response {
    rec.record("POST /create-guest-ticket", Some(body.clone()));
    if body["email"] == REJECTED_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "status": 400,
                "error": "Bad Request",
                "message": "Email must be valid"
            })),
        )
            .into_response();
    }

    format!(
        "Guest ticket created for {} {}\nEmail: {}\nPhone: {}",
        body["name"].as_str().unwrap_or_default(),
        body["surname"].as_str().unwrap_or_default(),
        body["email"].as_str().unwrap_or_default(),
        body["phone"].as_str().unwrap_or_default()
    )
    .into_response()
}

// Start the mock backend and return its base URL.
pub async fn spawn_backend() -> (String, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route("/check-unsigned-documents", get(list_documents))
        .route("/sign-document", post(sign_document))
        .route("/create-guest-ticket", post(create_guest))
        .with_state(recorder.clone());

    // Bind to an ephemeral port to avoid collisions with local services.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock backend failed");
    });

    (format!("http://{addr}"), recorder)
}

// A backend that accepts the connection but answers only after `delay`.
pub async fn spawn_slow_backend(delay: Duration) -> String {
    let app = Router::new().route(
        "/check-unsigned-documents",
        get(move || async move {
            tokio::time::sleep(delay).await;
            Json(json!([]))
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("slow backend failed");
    });

    format!("http://{addr}")
}

// A base URL that refuses connections: bind, note the port, then release it.
pub async fn closed_backend_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn gateway_for(base_url: &str) -> ToolGateway {
    gateway_with_timeout(base_url, 2000)
}

pub fn gateway_with_timeout(base_url: &str, timeout_ms: u64) -> ToolGateway {
    let vars = HashMap::from([
        ("ASKME_BACKEND_URL", base_url.to_string()),
        ("ASKME_REQUEST_TIMEOUT_MS", timeout_ms.to_string()),
    ]);
    let config = GatewayConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config");
    let backend = HttpBackend::new(&config).expect("http client");
    ToolGateway::standard(Arc::new(backend), &config)
}
