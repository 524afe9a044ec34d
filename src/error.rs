use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use handlebars::RenderError;
use log::error;
use thiserror::Error;

use crate::todo::StoreError;

/// Errors surfaced by request handlers
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Identity not found")]
    IdentityNotFound,

    /// Requested page or record does not exist, with the rendered 404 page
    #[error("Not found")]
    NotFound(String),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::IdentityNotFound => AppError::IdentityNotFound,
            StoreError::EmptyDescription => AppError::MalformedPayload(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedPayload(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
            AppError::IdentityNotFound => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            AppError::NotFound(page) => (StatusCode::NOT_FOUND, axum::response::Html(page)).into_response(),
            AppError::Render(ref e) => {
                error!("Failed to render page: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}
