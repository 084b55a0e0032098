//! HTTP surface of the Submission Processor.
//!
//! Routes:
//! - POST /submit   -> 200 JSON `{success, message}`
//! - OPTIONS /submit -> 204, CORS preflight
//! - other methods on /submit -> 405 JSON `{success: false, message: "Method not allowed"}`
//! - GET /health    -> 200 JSON status
//! - anything else   -> 404 JSON `{error: "Not found"}`

mod extract;

pub use extract::FormFields;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{ConnectInfo, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::processor::{SubmissionProcessor, SubmitResponse, METHOD_NOT_ALLOWED_MESSAGE};
use crate::render::SubmissionMeta;
use crate::schema::Submission;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<SubmissionProcessor>,
    /// Whether SMTP credentials were found at startup.
    pub smtp_configured: bool,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/submit",
            post(submit).options(preflight).fallback(method_not_allowed),
        )
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Serve on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().context("reading listener address")?;
    tracing::info!(%addr, "briefmail listening");

    let app = build_router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("HTTP server error")
}

fn cors_headers() -> [(HeaderName, &'static str); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (ACCESS_CONTROL_ALLOW_METHODS, "POST"),
        (ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

fn json_response(status: StatusCode, body: SubmitResponse) -> Response {
    (status, cors_headers(), Json(body)).into_response()
}

async fn submit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    FormFields(pairs): FormFields,
) -> Response {
    let submission = Submission::from_pairs(pairs);
    let meta = SubmissionMeta::now(peer.ip());
    let response = state.processor.process(&submission, &meta).await;
    json_response(StatusCode::OK, response)
}

async fn preflight() -> Response {
    (StatusCode::NO_CONTENT, cors_headers()).into_response()
}

async fn method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        SubmitResponse::failure(METHOD_NOT_ALLOWED_MESSAGE),
    )
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
        "smtp_configured": state.smtp_configured,
        "version": crate::VERSION,
    }))
}
