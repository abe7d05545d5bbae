//! Write, query, and graph snapshot handlers.

use axum::{body::Bytes, extract::rejection::JsonRejection, extract::State, Json};

use memlink_core::{
    GraphRequest, GraphSnapshot, QueryRequest, QueryResponse, WriteOutcome, WriteRequest,
};

use crate::error::ApiError;
use crate::state::AppState;

/// `POST /write`: create or merge an entity and its relationships.
pub async fn write(
    State(state): State<AppState>,
    payload: Result<Json<WriteRequest>, JsonRejection>,
) -> Result<Json<WriteOutcome>, ApiError> {
    let Json(req) = payload?;
    let cmd = req.validate(state.memory.default_label())?;
    Ok(Json(state.memory.write(cmd).await?))
}

/// `POST /query`: run a literal or preset query.
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, ApiError> {
    let Json(req) = payload?;
    let cmd = req.validate(state.memory.default_limit())?;
    Ok(Json(state.memory.query(cmd).await?))
}

/// `POST /graph`: build a node/link snapshot. An empty body uses defaults.
pub async fn graph(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GraphSnapshot>, ApiError> {
    let req: GraphRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GraphRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::Body(e.to_string()))?
    };
    let cmd = req.validate(state.memory.default_limit());
    Ok(Json(state.memory.snapshot(cmd).await?))
}
