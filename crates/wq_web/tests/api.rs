//! Integration tests for the HTTP surface, driven through the router with
//! an in-memory store and a canned page fetcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Method, Request, Response, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wq_core::{FetchError, NewArticle, QuizStorage};
use wq_inference::models::DummyModel;
use wq_inference::QuizGenerator;
use wq_scraper::{PageFetcher, QuizManager};
use wq_storage::MemoryStorage;
use wq_web::{create_app, AppState};

const PAGE: &str = r#"<html><body>
    <h1 id="firstHeading">Lighthouse</h1>
    <div class="mw-parser-output">
      <p>A lighthouse is a tower that emits light.</p>
      <h2><span class="mw-headline">History</span></h2>
      <p>The Pharos of Alexandria was an early example.</p>
    </div></body></html>"#;

struct CannedFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl PageFetcher for CannedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("/wiki/Unreachable") {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 503,
            });
        }
        Ok(PAGE.to_string())
    }
}

struct TestApp {
    router: Router,
    storage: Arc<MemoryStorage>,
    fetcher: Arc<CannedFetcher>,
}

fn build_test_app() -> TestApp {
    let storage = Arc::new(MemoryStorage::new());
    let fetcher = Arc::new(CannedFetcher {
        calls: AtomicUsize::new(0),
    });
    let generator = QuizGenerator::new(Arc::new(DummyModel::replying("```json\n{oops\n```")), false);
    let manager = QuizManager::new(fetcher.clone(), generator, storage.clone());
    TestApp {
        router: create_app(AppState::new(Arc::new(manager))),
        storage,
        fetcher,
    }
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// POST /generate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn generate_new_url_returns_created_quiz() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/generate",
        json!({"url": "https://en.wikipedia.org/wiki/Lighthouse"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Lighthouse");
    assert_eq!(json["url"], "https://en.wikipedia.org/wiki/Lighthouse");

    let quiz = json["quiz"].as_array().unwrap();
    assert!((5..=10).contains(&quiz.len()));
    for question in quiz {
        let options = question["options"].as_array().unwrap();
        assert_eq!(options.len(), 4);
        assert!(options.contains(&question["correct_answer"]));
    }
}

#[tokio::test]
async fn generate_twice_returns_same_quiz() {
    let app = build_test_app();
    let body = json!({"url": "https://en.wikipedia.org/wiki/Lighthouse"});

    let first = body_json(post_json(&app.router, "/generate", body.clone()).await).await;
    let second = post_json(&app.router, "/generate", body).await;
    assert_eq!(second.status(), StatusCode::CREATED);
    let second = body_json(second).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generate_scrape_failure_is_bad_request() {
    let app = build_test_app();
    let response = post_json(
        &app.router,
        "/generate",
        json!({"url": "https://en.wikipedia.org/wiki/Unreachable"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["detail"].as_str().unwrap().starts_with("Failed to scrape URL"));
}

#[tokio::test]
async fn generate_invalid_url_is_bad_request() {
    let app = build_test_app();
    let response = post_json(&app.router, "/generate", json!({"url": "wikipedia"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generate_undecodable_body_reports_detail() {
    let app = build_test_app();

    let response = post_json(&app.router, "/generate", json!({"link": "https://example.org"})).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_json(response).await["detail"].is_string());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/generate")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = send(&app.router, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["detail"].is_string());
    assert_eq!(app.fetcher.calls.load(Ordering::SeqCst), 0);
}

// ---------------------------------------------------------------------------
// GET /quiz/{id}
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quiz_lookup_by_id() {
    let app = build_test_app();
    let created = body_json(
        post_json(
            &app.router,
            "/generate",
            json!({"url": "https://en.wikipedia.org/wiki/Lighthouse"}),
        )
        .await,
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let response = get(&app.router, &format!("/quiz/{}", id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], id);
    assert_eq!(json, created);
}

#[tokio::test]
async fn quiz_unknown_id_is_not_found() {
    let app = build_test_app();
    let response = get(&app.router, "/quiz/424242").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Quiz not found");
}

#[tokio::test]
async fn quiz_non_numeric_id_reports_detail() {
    let app = build_test_app();
    let response = get(&app.router, "/quiz/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["detail"].is_string());
}

// ---------------------------------------------------------------------------
// GET /history
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_limit_returns_newest() {
    let app = build_test_app();
    for name in ["First", "Second", "Third"] {
        app.storage
            .create_article(NewArticle {
                url: format!("https://en.wikipedia.org/wiki/{}", name),
                title: name.to_string(),
                summary: String::new(),
                raw_html: String::new(),
            })
            .await
            .unwrap();
    }

    let response = get(&app.router, "/history?limit=2").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let titles: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, vec!["Third", "Second"]);

    let all = body_json(get(&app.router, "/history").await).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert!(all[0]["created_at"].is_string());

    let skipped = body_json(get(&app.router, "/history?skip=2&limit=5").await).await;
    assert_eq!(skipped[0]["title"], "First");
}

#[tokio::test]
async fn history_bad_query_reports_detail() {
    let app = build_test_app();
    let response = get(&app.router, "/history?skip=-1").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["detail"].is_string());
}

#[tokio::test]
async fn root_reports_running() {
    let app = build_test_app();
    let response = get(&app.router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await["message"].is_string());
}
