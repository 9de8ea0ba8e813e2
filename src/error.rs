use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Player not found")]
    NotFound,
    #[error("No fields provided for update")]
    NoFieldsProvided,
    #[error("{0}")]
    MalformedBody(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Body of every non-2xx response, and of the delete confirmation.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::NoFieldsProvided | ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if let ApiError::Database(ref err) = self {
            tracing::error!(error = %err, "store error");
        }

        // Store errors are passed through verbatim.
        let body = Json(MessageResponse::new(self.to_string()));

        (status, body).into_response()
    }
}
