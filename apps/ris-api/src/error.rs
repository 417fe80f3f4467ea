//! Error responses for the search API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Search(#[from] ris_core::Error),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        use ris_core::Error as E;
        match self {
            ApiError::Search(E::InvalidQuery(_)) | ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Search(E::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Search(E::Embedding(_) | E::SearchBackend(_)) => StatusCode::BAD_GATEWAY,
            ApiError::Search(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Search(e) if status.is_server_error() => {
                tracing::error!(code = e.code(), error = %e, "search failed");
                e.to_string()
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
