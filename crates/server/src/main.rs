use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit},
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ParseRequest, ParseResponse, PARSE_ROUTE},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use config::{load_settings, Settings};

const INDEX_HTML: &str = include_str!("../assets/index.html");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let settings = load_settings()?;
    let app = build_router(&settings);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, max_body_bytes = settings.max_body_bytes, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(settings: &Settings) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(PARSE_ROUTE, post(http_parse))
        .layer(DefaultBodyLimit::max(settings.max_body_bytes))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_parse(
    payload: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<ParseResponse>, (StatusCode, Json<ApiError>)> {
    let Json(req) = payload.map_err(reject)?;
    Ok(Json(api::parse_sentence(&req)))
}

fn reject(rejection: JsonRejection) -> (StatusCode, Json<ApiError>) {
    let status = rejection.status();
    let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
        ErrorCode::PayloadTooLarge
    } else {
        ErrorCode::Validation
    };
    warn!(%status, error = %rejection.body_text(), "rejected parse request");
    (status, Json(ApiError::new(code, rejection.body_text())))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
