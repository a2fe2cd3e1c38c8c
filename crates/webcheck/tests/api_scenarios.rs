//! Posts scenarios against an in-process posts server.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::extract::{Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use webcheck::scenarios::api::{self, MOCK_NOT_FOUND};
use webcheck::{
    BrowserSession, HttpMethod, MockSession, PostsClient, SessionProvider, SuiteConfig,
    TestHarness, WebcheckResult,
};

#[derive(Debug, Clone)]
struct Seen {
    method: Method,
    path: String,
    content_type: Option<String>,
}

#[derive(Clone, Default)]
struct Server {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Server {
    fn record(&self, method: Method, path: String, headers: &HeaderMap) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            content_type,
        });
    }
}

fn stored(id: u64) -> Value {
    json!({
        "userId": 1,
        "id": id,
        "title": format!("title {id}"),
        "body": format!("body {id}"),
    })
}

async fn list(State(s): State<Server>, headers: HeaderMap) -> Json<Value> {
    s.record(Method::GET, "/posts".into(), &headers);
    Json(json!([stored(1), stored(2), stored(3)]))
}

async fn create(
    State(s): State<Server>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    s.record(Method::POST, "/posts".into(), &headers);
    body["id"] = json!(101);
    (StatusCode::CREATED, Json(body))
}

async fn read(
    State(s): State<Server>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    s.record(Method::GET, format!("/posts/{id}"), &headers);
    if (1..=100).contains(&id) {
        (StatusCode::OK, Json(stored(id)))
    } else {
        (StatusCode::NOT_FOUND, Json(json!({})))
    }
}

async fn replace(
    State(s): State<Server>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    s.record(Method::PUT, format!("/posts/{id}"), &headers);
    body["id"] = json!(id);
    Json(body)
}

async fn patch(
    State(s): State<Server>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    s.record(Method::PATCH, format!("/posts/{id}"), &headers);
    let mut post = stored(id);
    if let (Some(target), Some(changes)) = (post.as_object_mut(), body.as_object()) {
        for (k, v) in changes {
            target.insert(k.clone(), v.clone());
        }
    }
    Json(post)
}

async fn remove(State(s): State<Server>, Path(id): Path<u64>, headers: HeaderMap) -> Json<Value> {
    s.record(Method::DELETE, format!("/posts/{id}"), &headers);
    Json(json!({}))
}

async fn spawn_server() -> (String, Server) {
    let server = Server::default();
    let app = Router::new()
        .route("/posts", get(list).post(create))
        .route(
            "/posts/{id}",
            get(read).put(replace).patch(patch).delete(remove),
        )
        .with_state(server.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/posts"), server)
}

fn config(api_url: &str) -> SuiteConfig {
    SuiteConfig::default().with_api_url(api_url)
}

fn mock_browser() -> impl SessionProvider {
    || -> WebcheckResult<Box<dyn BrowserSession>> { Ok(Box::new(MockSession::new())) }
}

#[tokio::test]
async fn test_every_api_case_passes() {
    let (url, _server) = spawn_server().await;
    let tmp = tempfile::tempdir().unwrap();
    let config = config(&url).with_screenshot_dir(tmp.path());
    let browser = mock_browser();
    let provider: &dyn SessionProvider = &browser;

    let results = TestHarness::new()
        .run(&api::api_suite(), &config, Some(provider))
        .await;

    for failure in results.failures() {
        eprintln!("{}: {:?}", failure.name, failure.error);
    }
    assert!(results.all_passed());
    assert_eq!(results.total(), 13);
}

#[tokio::test]
async fn test_writes_send_json_utf8() {
    let (url, server) = spawn_server().await;
    let client = PostsClient::from_config(&config(&url)).unwrap();

    client.create_post(&api::new_post()).await.unwrap();
    client.update_post(1, &api::updated_post()).await.unwrap();
    client.patch_post(1, &api::title_patch()).await.unwrap();
    client.get_post(1).await.unwrap();

    let seen = server.seen.lock().unwrap().clone();
    for write in seen.iter().filter(|s| s.method != Method::GET) {
        assert_eq!(
            write.content_type.as_deref(),
            Some("application/json; charset=UTF-8"),
            "{} {}",
            write.method,
            write.path
        );
    }
    assert!(seen.iter().find(|s| s.method == Method::GET).unwrap().content_type.is_none());
}

#[tokio::test]
async fn test_patch_and_put_use_distinct_verbs() {
    let (url, server) = spawn_server().await;
    let client = PostsClient::from_config(&config(&url)).unwrap();

    let patched = client.patch_post(1, &api::title_patch()).await.unwrap();
    let replaced = client.update_post(1, &api::updated_post()).await.unwrap();

    let methods: Vec<Method> = server
        .seen
        .lock()
        .unwrap()
        .iter()
        .map(|s| s.method.clone())
        .collect();
    assert_eq!(methods, vec![Method::PATCH, Method::PUT]);
    assert_eq!(patched.body["body"], "body 1");
    assert_eq!(replaced.body["body"], api::updated_post().body);
}

#[tokio::test]
async fn test_non_2xx_is_data_not_error() {
    let (url, _server) = spawn_server().await;
    let client = PostsClient::from_config(&config(&url)).unwrap();
    let resp = client.get_post(9999).await.unwrap();
    assert_eq!(resp.status, 404);
    assert!(!resp.is_success());
}

#[tokio::test]
async fn test_failing_server_reports_assertion() {
    let app = Router::new().route(
        "/posts",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = config(&format!("http://{addr}/posts"));
    let suite = api::api_suite().filtered("return 200 OK status");
    let results = TestHarness::new().run(&suite, &config, None).await;

    assert_eq!(results.total(), 1);
    let error = results.results[0].error.clone().unwrap();
    assert!(error.contains("expected status 200, got 500"), "{error}");
}

#[tokio::test]
async fn test_intercepted_get_never_reaches_server() {
    let (url, server) = spawn_server().await;
    let config = config(&url);
    let mut session = MockSession::new();

    api::delete_then_get_intercepted(&mut session, &config)
        .await
        .unwrap();

    let post_url = format!("{url}/10");
    let fetched = session.fetch(&post_url, HttpMethod::Get).await.unwrap();
    assert_eq!(fetched.json().unwrap()["error"], MOCK_NOT_FOUND);
    let seen = server.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, Method::DELETE);
}
