#![cfg(feature = "web")]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use farmweb::app::{AppState, router};
use farmweb::blog::BlogClient;
use farmweb::pages::Pages;
use farmweb::todo::{SEED_DESCRIPTION, TodoItem, TodoStore};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

// Helper to build an app whose blog upstream is never contacted
fn test_app() -> (Router, Arc<AppState>) {
    app_with_assets(PathBuf::from("static/images"))
}

fn app_with_assets(assets_dir: PathBuf) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        store: TodoStore::new(),
        blog: BlogClient::new("http://127.0.0.1:9"),
        pages: Pages::new().unwrap(),
        assets_dir,
    });
    (router(state.clone()), state)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list(app: &Router, cookie: &str) -> Vec<TodoItem> {
    let response = send(app, get("/api/todos", Some(cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_string(response).await).unwrap()
}

// First visit: returns the seeded list and the "userid=..." cookie pair
async fn first_visit(app: &Router) -> (String, Vec<TodoItem>) {
    let response = send(app, get("/api/todos", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let header = set_cookie(&response).expect("new visitor should get a cookie");
    let pair = header.split(';').next().unwrap().trim().to_string();
    let todos: Vec<TodoItem> = serde_json::from_str(&body_string(response).await).unwrap();

    (pair, todos)
}

#[tokio::test]
async fn test_first_visit_sets_identity_cookie() {
    let (app, state) = test_app();

    let response = send(&app, get("/api/todos", None)).await;
    let header = set_cookie(&response).unwrap();

    assert!(header.starts_with("userid="));
    assert!(header.contains("Path=/"));
    assert!(!header.contains("Expires"));
    assert!(!header.contains("Max-Age"));

    let identity = header.split(';').next().unwrap().trim_start_matches("userid=");
    assert!(state.store.contains(identity));
}

#[tokio::test]
async fn test_returning_visit_keeps_identity() {
    let (app, state) = test_app();
    let (cookie, first) = first_visit(&app).await;

    let response = send(&app, get("/api/todos", Some(&cookie))).await;
    assert!(set_cookie(&response).is_none());

    let second: Vec<TodoItem> = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(first, second);
    assert_eq!(state.store.len(), 1);
}

#[tokio::test]
async fn test_two_new_visitors_get_different_identities() {
    let (app, _) = test_app();
    let (a, _) = first_visit(&app).await;
    let (b, _) = first_visit(&app).await;
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_create_delete_scenario() {
    let (app, _) = test_app();
    let (cookie, todos) = first_visit(&app).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].description, SEED_DESCRIPTION);
    assert!(!todos[0].done);

    let response = send(&app, post_form("/todos", Some(&cookie), "description=Buy+milk")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let todos = list(&app, &cookie).await;
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[1].description, "Buy milk");

    let body = format!("id={}", todos[0].id);
    let response = send(&app, post_form("/todos/delete", Some(&cookie), &body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let todos = list(&app, &cookie).await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].description, "Buy milk");
}

#[tokio::test]
async fn test_delete_unknown_item_is_noop() {
    let (app, _) = test_app();
    let (cookie, before) = first_visit(&app).await;

    let response = send(&app, post_form("/todos/delete", Some(&cookie), "id=missing")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(list(&app, &cookie).await, before);
}

#[tokio::test]
async fn test_toggle() {
    let (app, _) = test_app();
    let (cookie, todos) = first_visit(&app).await;

    let body = format!("id={}", todos[0].id);
    let response = send(&app, post_form("/todos/toggle", Some(&cookie), &body)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert!(list(&app, &cookie).await[0].done);

    send(&app, post_form("/todos/toggle", Some(&cookie), &body)).await;
    assert!(!list(&app, &cookie).await[0].done);
}

#[tokio::test]
async fn test_actions_require_identity() {
    let (app, _) = test_app();

    let response = send(&app, post_form("/todos", None, "description=Buy+milk")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Identity not found");

    // cookie for an identity the store has never seen
    let response = send(
        &app,
        post_form("/todos", Some("userid=never-seen"), "description=Buy+milk"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, post_form("/todos/delete", Some("userid=never-seen"), "id=x")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, post_form("/todos/toggle", Some("userid=never-seen"), "id=x")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "Identity not found");

    let response = send(&app, post_form("/todos/toggle", None, "id=x")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_description_rejected() {
    let (app, _) = test_app();
    let (cookie, before) = first_visit(&app).await;

    let response = send(&app, post_form("/todos", Some(&cookie), "description=+++")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, post_form("/todos", Some(&cookie), "")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(list(&app, &cookie).await, before);
}

#[tokio::test]
async fn test_todo_page_renders_list() {
    let (app, _) = test_app();

    let response = send(&app, get("/", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_some());

    let html = body_string(response).await;
    assert!(html.contains(SEED_DESCRIPTION));
    assert!(html.contains("action=\"/todos\""));
}

#[tokio::test]
async fn test_survey_routes() {
    let (app, _) = test_app();

    let response = send(&app, get("/status", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("pass 1 / warn 1 / none 6"));

    let response = send(&app, get("/api/status", None)).await;
    let aspects: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(aspects.as_array().unwrap().len(), 8);
    assert_eq!(aspects[0]["slug"], "water");
    assert_eq!(aspects[0]["status"], "warn");
    assert!(aspects[0]["lastUpdated"].is_string());
    assert!(aspects[0]["ctaLabel"].is_string());
    assert!(aspects[0]["imageAlt"].is_string());
    assert!(aspects[0].get("cta_label").is_none());

    let response = send(&app, get("/api/survey", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_status_hides_missing_images() {
    let dir = std::env::temp_dir().join(format!("farmweb-assets-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("water.jpg"), b"jpg").unwrap();
    let (app, _) = app_with_assets(dir.clone());

    let html = body_string(send(&app, get("/status", None)).await).await;
    assert!(html.contains("src=\"/images/water.jpg\""));
    assert!(!html.contains("/images/soil.jpg"));

    let response = send(&app, get("/api/status", None)).await;
    let aspects: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(aspects[0]["image"], "/images/water.jpg");
    assert!(aspects[1].get("image").is_none());

    let response = send(&app, get("/images/water.jpg", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_farmer_routes() {
    let (app, _) = test_app();

    let response = send(&app, get("/api/farmers", None)).await;
    let farmers: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(farmers.as_array().unwrap().len(), 3);

    let response = send(&app, get("/api/farmers/F002", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let farmer: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(farmer["area"], "ลพบุรี");

    let response = send(&app, get("/api/farmers/F999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, get("/farmers/F001", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/farmers/F999", None)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_string(response).await.contains("Farmer not found"));
}
