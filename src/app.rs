use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use log::{error, info};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::services::ServeDir;

use crate::blog::BlogClient;
use crate::config::Config;
use crate::error::AppError;
use crate::farmers::{FARMERS, find_farmer};
use crate::identity::{existing_identity, identify};
use crate::pages::Pages;
use crate::survey::{STATUS_ASPECTS, SURVEY_ASPECTS, SurveyAspect, with_available_images};
use crate::todo::{TodoItem, TodoStore};

/// Shared state handed to every handler
pub struct AppState {
    pub store: TodoStore,
    pub blog: BlogClient,
    pub pages: Pages,
    /// Directory served under `/images`
    pub assets_dir: PathBuf,
}

impl AppState {
    /// Build the state for a server talking to the configured upstream
    pub fn new(config: &Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        Ok(Arc::new(AppState {
            store: TodoStore::new(),
            blog: BlogClient::new(&config.blog_url),
            pages: Pages::new()?,
            assets_dir: PathBuf::from(&config.assets_dir),
        }))
    }
}

#[derive(Deserialize)]
struct CreateTodoForm {
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct TodoIdForm {
    id: String,
}

/// Build the application router
///
/// Static images are served from the state's `assets_dir` under `/images`.
pub fn router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(&state.assets_dir);
    Router::new()
        .route("/", get(todos_page))
        .route("/api/todos", get(todos_json))
        .route("/todos", post(create_todo))
        .route("/todos/delete", post(delete_todo))
        .route("/todos/toggle", post(toggle_todo))
        .route("/blog", get(blog_index))
        .route("/blog/:slug", get(blog_post))
        .route("/status", get(status_page))
        .route("/api/status", get(status_json))
        .route("/api/survey", get(survey_json))
        .route("/api/farmers", get(farmers_json))
        .route("/api/farmers/:id", get(farmer_json))
        .route("/farmers/:id", get(farmer_page))
        .nest_service("/images", images)
        .with_state(state)
}

/// Start the web server and block until it shuts down
///
/// # Arguments
/// * `config` - Bind address, upstream URL and assets directory
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or the startup error
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Initializing state...");
    let state = AppState::new(&config)?;
    let app = router(state);

    let address = config.address();
    let listener = TcpListener::bind(&address).await?;
    info!("Listening on http://{address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

// Page load: resolve (or mint) the identity, then fetch its list
fn load_todos(state: &AppState, jar: CookieJar) -> (CookieJar, Vec<TodoItem>) {
    let (jar, resolved) = identify(jar);
    let todos = state.store.get_todos(&resolved.identity);
    (jar, todos)
}

async fn todos_page(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), AppError> {
    let (jar, todos) = load_todos(&state, jar);
    Ok((jar, Html(state.pages.todos(&todos)?)))
}

async fn todos_json(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<Vec<TodoItem>>) {
    let (jar, todos) = load_todos(&state, jar);
    (jar, Json(todos))
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<CreateTodoForm>,
) -> Result<Redirect, AppError> {
    let identity = existing_identity(&jar).ok_or(AppError::IdentityNotFound)?;
    state.store.create_todo(&identity, &form.description)?;
    Ok(Redirect::to("/"))
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<TodoIdForm>,
) -> Result<Redirect, AppError> {
    let identity = existing_identity(&jar).ok_or(AppError::IdentityNotFound)?;
    state.store.delete_todo(&identity, &form.id)?;
    Ok(Redirect::to("/"))
}

async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<TodoIdForm>,
) -> Result<Redirect, AppError> {
    let identity = existing_identity(&jar).ok_or(AppError::IdentityNotFound)?;
    state.store.toggle_todo(&identity, &form.id)?;
    Ok(Redirect::to("/"))
}

async fn blog_index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let summaries = state.blog.load_index().await;
    Ok(Html(state.pages.blog(summaries.as_deref())?))
}

async fn blog_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    match state.blog.load_post(&slug).await {
        Ok(post) => Ok(Html(state.pages.post(post.as_ref())?)),
        Err(_) => Err(not_found(&state, "Post not found")),
    }
}

fn status_aspects(state: &AppState) -> Vec<SurveyAspect> {
    with_available_images(&STATUS_ASPECTS, &state.assets_dir)
}

async fn status_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    Ok(Html(state.pages.status(&status_aspects(&state))?))
}

async fn status_json(State(state): State<Arc<AppState>>) -> Json<Vec<SurveyAspect>> {
    Json(status_aspects(&state))
}

async fn survey_json() -> impl IntoResponse {
    Json(&*SURVEY_ASPECTS)
}

async fn farmers_json() -> impl IntoResponse {
    Json(&*FARMERS)
}

async fn farmer_json(Path(id): Path<String>) -> Response {
    match find_farmer(&id) {
        Some(farmer) => Json(farmer).into_response(),
        None => (StatusCode::NOT_FOUND, "Farmer not found").into_response(),
    }
}

async fn farmer_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let farmer = find_farmer(&id).ok_or_else(|| not_found(&state, "Farmer not found"))?;
    Ok(Html(state.pages.farmer(farmer)?))
}

fn not_found(state: &AppState, message: &str) -> AppError {
    match state.pages.not_found(message) {
        Ok(page) => AppError::NotFound(page),
        Err(e) => AppError::Render(e),
    }
}
