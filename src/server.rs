//! HTTP trigger surface
//!
//! - `GET /` health message
//! - `POST /scrape` runs a named configuration (default when omitted)
//! - `POST /chat` answers a message from the loaded knowledge
//!
//! Runs are not serialized here: concurrent `/scrape` calls for the same
//! configuration race on its storage path.

use crate::bot::ChatBot;
use crate::config::load_named_config;
use crate::pipeline::run_with_config;
use crate::record::FlatRow;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared state behind the router
pub struct AppState {
    config_dir: PathBuf,
    default_config: String,
    bot: RwLock<ChatBot>,
}

impl AppState {
    pub fn new(config_dir: impl Into<PathBuf>, default_config: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            default_config: default_config.into(),
            bot: RwLock::new(ChatBot::default()),
        }
    }

    /// Loads the responder from the default configuration's stored rows
    ///
    /// A missing or unreadable file leaves the responder empty.
    pub async fn reload_bot(&self) {
        let bot = match load_bot(&self.config_dir, &self.default_config) {
            Ok(bot) => bot,
            Err(e) => {
                tracing::warn!("Responder starts without data: {}", e);
                ChatBot::default()
            }
        };
        *self.bot.write().await = bot;
    }
}

fn load_bot(config_dir: &Path, name: &str) -> anyhow::Result<ChatBot> {
    let config = load_named_config(config_dir, name)?;
    Ok(ChatBot::from_store(Path::new(&config.storage.path))?)
}

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub config: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub status: &'static str,
    pub config: String,
    pub rows: usize,
    pub path: String,
    pub sample: Vec<FlatRow>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

type ApiError = (StatusCode, Json<Value>);

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/scrape", post(scrape))
        .route("/chat", post(chat))
        .with_state(state)
}

async fn home() -> Json<Value> {
    Json(json!({ "message": "MonAgent API is running 🚀" }))
}

async fn scrape(
    State(state): State<Arc<AppState>>,
    body: Option<Json<ScrapeRequest>>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let name = body
        .and_then(|Json(request)| request.config)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| state.default_config.clone());

    let result = match run_with_config(&state.config_dir, &name).await {
        Ok(result) => result,
        Err(e) if e.is_consent_denied() => {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "status": "denied", "message": e.to_string() })),
            ));
        }
        Err(e) => {
            tracing::error!("Scrape of '{}' failed: {}", name, e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": e.to_string() })),
            ));
        }
    };

    if name == state.default_config {
        state.reload_bot().await;
    }

    Ok(Json(ScrapeResponse {
        status: "success",
        config: name,
        rows: result.rows,
        path: result.path.display().to_string(),
        sample: result.sample.iter().map(FlatRow::from).collect(),
    }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let message = body.ok().and_then(|Json(request)| request.message);
    let Some(message) = message else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing 'message' field" })),
        ));
    };

    let reply = state.bot.read().await.reply(&message);
    Ok(Json(ChatResponse { reply }))
}

/// Binds `addr` and serves until the process exits
pub async fn serve(addr: &str, state: Arc<AppState>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
