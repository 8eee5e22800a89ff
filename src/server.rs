//! HTTP surface: `GET /` and `POST /verify`.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::verifier::{NewsVerifier, Verdict};

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Deserialize)]
pub struct VerifyForm {
    #[serde(default)]
    pub news: String,
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn verify(
    State(verifier): State<Arc<NewsVerifier>>,
    request: Request,
) -> Result<Json<Verdict>, Response> {
    let news = news_field(request).await?;
    Ok(Json(verifier.verify(&news)))
}

/// The `news` field of a urlencoded or multipart form. Any other body,
/// including none at all, has no such field and reads as empty.
async fn news_field(request: Request) -> Result<String, Response> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/x-www-form-urlencoded") {
        let Form(form) = Form::<VerifyForm>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        return Ok(form.news);
    }

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(IntoResponse::into_response)?
        {
            if field.name() == Some("news") {
                return field.text().await.map_err(IntoResponse::into_response);
            }
        }
        return Ok(String::new());
    }

    tracing::debug!(%content_type, "No form body");
    Ok(String::new())
}

/// Builds the router around an already loaded verifier.
pub fn router(verifier: Arc<NewsVerifier>, max_body_bytes: Option<usize>) -> Router {
    let body_limit = match max_body_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/", get(index))
        .route("/verify", post(verify))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(verifier)
}

/// Binds `config.bind_addr()` and serves until SIGINT/SIGTERM.
pub async fn serve(config: &ServerConfig, verifier: Arc<NewsVerifier>) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, "🚀 Listening");

    axum::serve(listener, router(verifier, config.max_body_bytes))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }
}
