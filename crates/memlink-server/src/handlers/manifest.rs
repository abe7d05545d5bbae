//! Static manifest files. Unrelated to the data path.

use std::path::Path;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::state::AppState;

pub const PLUGIN_MANIFEST: &str = ".well-known/ai-plugin.json";
pub const OPENAPI_SPEC: &str = "openapi.yaml";

pub async fn plugin_manifest(State(state): State<AppState>) -> Response {
    serve_file(&state.static_dir, PLUGIN_MANIFEST, "application/json").await
}

pub async fn openapi_spec(State(state): State<AppState>) -> Response {
    serve_file(&state.static_dir, OPENAPI_SPEC, "text/yaml").await
}

async fn serve_file(dir: &Path, relative: &str, content_type: &'static str) -> Response {
    let path = dir.join(relative);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type)], bytes).into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Static file missing");
            (StatusCode::NOT_FOUND, format!("{relative} not found")).into_response()
        }
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Failed to read static file");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to read {relative}: {e}"),
            )
                .into_response()
        }
    }
}
