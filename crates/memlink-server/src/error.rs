//! HTTP error mapping.
//!
//! Client mistakes map to 400 and store failures to 500. Both render as
//! `{"status": "error", "error": <message>}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use memlink_core::MemlinkError;
use memlink_graph::GraphError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The body was not valid JSON or did not match the endpoint schema.
    #[error("Malformed request body: {0}")]
    Body(String),

    #[error(transparent)]
    Request(#[from] MemlinkError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: &'static str,
    error: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::Request(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            Self::Request(_) | Self::Graph(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }

        let body = ErrorBody {
            status: "error",
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
