//! Shared test fixtures: an in-process app and a fake remote catalog

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::{AppConfig, RemoteConfig, StorageBackend, StorageConfig},
    ids::IdGenerator,
    remote::HttpGateway,
    repository::{MemoryStore, Repository},
    services::{notifier::ChangeNotifier, Services},
    AppState,
};

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    /// App wired to the given remote base URL ("" for local-only mode)
    pub fn new(base_url: &str) -> Self {
        let config = AppConfig {
            remote: RemoteConfig {
                base_url: base_url.to_string(),
                timeout_secs: Some(5),
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                ..Default::default()
            },
            ..Default::default()
        };

        let store = Arc::new(MemoryStore::new());
        let repository = Repository::new(store.clone(), Arc::new(IdGenerator::new()));
        let remote = HttpGateway::new(&config.remote).expect("client");
        let services = Services::new(repository, Arc::new(remote), ChangeNotifier::new(16));

        let state = AppState {
            config: Arc::new(config),
            services: Arc::new(services),
        };

        Self {
            router: api::create_router(state.clone()),
            state,
            store,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }
}

/// Calls received by the fake remote, per route family
#[derive(Default)]
pub struct RemoteCalls {
    pub prizes: AtomicUsize,
    pub reviews_posted: AtomicUsize,
}

impl RemoteCalls {
    pub fn prizes(&self) -> usize {
        self.prizes.load(Ordering::SeqCst)
    }

    pub fn reviews_posted(&self) -> usize {
        self.reviews_posted.load(Ordering::SeqCst)
    }
}

/// Misbehaviour injected into the fake remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    None,
    /// `POST /books` answers 500
    BookCreate,
    /// `POST /prizes` answers with a non-numeric id
    PrizeId,
}

/// Start a fake remote catalog on an ephemeral port.
///
/// Book 10 exists (with one nested review), author 1 exists.
pub async fn spawn_remote(fault: Fault) -> (String, Arc<RemoteCalls>) {
    let calls = Arc::new(RemoteCalls::default());

    let prize_calls = calls.clone();
    let review_calls = calls.clone();

    let app = Router::new()
        .route(
            "/authors",
            get(|| async {
                Json(json!([
                    {"id": 1, "name": "Remote Author", "birthDate": "1950-01-01",
                     "books": [{"id": 10, "name": "Remote Book"}], "prizes": []}
                ]))
            })
            .post(|Json(body): Json<Value>| async move {
                let mut created = body;
                created["id"] = json!(2);
                (StatusCode::CREATED, Json(created))
            }),
        )
        .route(
            "/authors/:id",
            get(|Path(id): Path<i64>| async move {
                if id == 1 {
                    Json(json!({"id": 1, "name": "Remote Author"})).into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
            })
            .delete(|Path(id): Path<i64>| async move {
                if id == 1 { StatusCode::NO_CONTENT } else { StatusCode::NOT_FOUND }
            }),
        )
        .route(
            "/books",
            get(|| async { Json(json!([{"id": 10, "title": "Remote Book"}])) }).post(
                move |Json(body): Json<Value>| async move {
                    if fault == Fault::BookCreate {
                        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
                    }
                    let mut created = body;
                    created["id"] = json!(11);
                    (StatusCode::CREATED, Json(created)).into_response()
                },
            ),
        )
        .route(
            "/books/:id",
            get(|Path(id): Path<i64>| async move {
                if id == 10 {
                    Json(json!({
                        "id": 10,
                        "name": "Remote Book",
                        "reviews": [{"id": 5, "name": "Ana", "description": "Great"}]
                    }))
                    .into_response()
                } else {
                    StatusCode::NOT_FOUND.into_response()
                }
            }),
        )
        .route(
            "/books/:id/reviews",
            get(|| async { Json(json!([])) }).post(move |Json(body): Json<Value>| {
                let calls = review_calls.clone();
                async move {
                    calls.reviews_posted.fetch_add(1, Ordering::SeqCst);
                    let mut created = body;
                    created["id"] = json!(77);
                    (StatusCode::CREATED, Json(created))
                }
            }),
        )
        .route("/authors/:author/books/:book", post(|| async { StatusCode::OK }))
        .route(
            "/prizes",
            post(move |Json(body): Json<Value>| {
                let calls = prize_calls.clone();
                async move {
                    calls.prizes.fetch_add(1, Ordering::SeqCst);
                    let mut created = body;
                    created["id"] = if fault == Fault::PrizeId { json!("abc") } else { json!(21) };
                    (StatusCode::CREATED, Json(created))
                }
            }),
        )
        .route("/prizes/:prize/author/:author", post(|| async { StatusCode::OK }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    (format!("http://{}", addr), calls)
}

/// Base URL of a remote that refuses every connection
pub async fn unreachable_remote() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{}", addr)
}

pub fn catalog_entry() -> Value {
    json!({
        "authorName": "Gabriel García Márquez",
        "authorBirthDate": "1927-03-06",
        "bookName": "Cien años de soledad",
        "bookPublishingDate": "1967-05-30",
        "prizeName": "Nobel",
        "prizePremiationDate": "1982-10-21"
    })
}
