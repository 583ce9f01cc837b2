//! HTTP front end.
//!
//! - `GET /?f=<pattern>&view=<deps|focus>`: the rendered graph of `pattern`,
//!   or of the configured root when `f` is absent or empty.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use tracing::{error, info};

use pkgdep_error::{Error, Result};

use crate::pipeline::{GraphView, Pipeline};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub default_root: String,
}

impl AppState {
    pub fn new(pipeline: Pipeline, default_root: impl Into<String>) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            default_root: default_root.into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    pub f: Option<String>,
    pub view: Option<GraphView>,
}

/// Every failure is a 500 whose body is the error text.
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub async fn graph_handler(
    State(state): State<AppState>,
    Query(query): Query<GraphQuery>,
) -> std::result::Result<Response, ApiError> {
    let pattern = query
        .f
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| state.default_root.clone());
    let view = query.view.unwrap_or_default();
    info!(%pattern, ?view, "graph requested");

    let pipeline = state.pipeline.clone();
    let (format, body) = tokio::task::spawn_blocking(move || -> Result<_> {
        let artifact = pipeline.render(&pattern, view)?;
        Ok((artifact.format(), artifact.read()?))
    })
    .await
    .map_err(|e| Error::unexpected("render task failed").with_operation("server::graph").set_source(e))??;

    Ok(([(header::CONTENT_TYPE, format.mime_type())], body).into_response())
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(graph_handler)).with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::from(e).with_operation("server::bind").with_context("addr", addr.to_string()))?;
    info!("Listening on http://{}", addr);
    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::from(e).with_operation("server::serve"))
}
