//! HTTP health check endpoint for container orchestration and uptime monitors.
//!
//! `GET /health` reports uptime, Discord connectivity, the image folder and the recency buffer as
//! JSON.  Every other route is a 404.  Problems with the image folder are reported inside the
//! document rather than as an HTTP error.

use crate::{config::Config, image_set, log_internal, volatile_state::VolatileState};
use anyhow::Result;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serenity::{all::ShardManager, gateway::ConnectionStage};
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct HealthState {
    pub cfg: Arc<Config>,
    pub vstate: Arc<RwLock<VolatileState>>,
    pub gateway: Arc<dyn GatewayStatus>,
}

/// Anything that can tell whether the bot is connected to Discord
#[serenity::async_trait]
pub trait GatewayStatus: Send + Sync {
    async fn connection(&self) -> Connection;
}

/// Gateway connectivity at the time of the request
pub struct Connection {
    pub online: bool,
    pub latency: Option<Duration>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    /// Seconds since startup
    pub uptime: u64,
    pub timestamp: String,
    pub discord: DiscordStatus,
    pub image_folder: ImageFolderStatus,
    pub image_history: ImageHistoryStatus,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordStatus {
    pub bot_status: &'static str,
    pub bot_user: String,
    pub latency_ms: Option<u64>,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFolderStatus {
    pub path: String,
    pub exists: bool,
    pub image_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(serde::Serialize)]
pub struct ImageHistoryStatus {
    pub count: usize,
    pub max: usize,
}

#[serenity::async_trait]
impl GatewayStatus for ShardManager {
    async fn connection(&self) -> Connection {
        let runners = self.runners.lock().await;
        let connected: Vec<_> = runners
            .values()
            .filter(|info| matches!(info.stage, ConnectionStage::Connected))
            .collect();

        Connection {
            online: !connected.is_empty(),
            latency: connected.iter().filter_map(|info| info.latency).max(),
        }
    }
}

impl HealthReport {
    pub async fn collect(
        cfg: &Config,
        vstate: &RwLock<VolatileState>,
        connection: Connection,
    ) -> Self {
        let (uptime, bot_user, history_count, history_max) = {
            let vstate = vstate.read().await;
            (
                vstate.uptime_seconds(),
                vstate.bot_user.clone(),
                vstate.recent.len(),
                vstate.recent.capacity(),
            )
        };

        let discord = DiscordStatus {
            bot_status: if connection.online { "online" } else { "offline" },
            bot_user: bot_user.unwrap_or_else(|| "not logged in".to_owned()),
            latency_ms: connection.latency.map(|latency| latency.as_millis() as u64),
        };

        Self {
            status: "ok",
            uptime,
            timestamp: chrono::Utc::now().to_rfc3339(),
            discord,
            image_folder: ImageFolderStatus::collect(cfg).await,
            image_history: ImageHistoryStatus {
                count: history_count,
                max: history_max,
            },
        }
    }
}

impl ImageFolderStatus {
    async fn collect(cfg: &Config) -> Self {
        let dir = cfg.general.image_folder.as_path();
        let mut status = Self {
            path: dir.to_string_lossy().into_owned(),
            exists: false,
            image_count: 0,
            error: None,
        };

        match image_set::ensure_dir(dir).await {
            Ok(()) => status.exists = true,
            Err(err) => {
                status.error = Some(err.to_string());
                return status;
            }
        }

        match image_set::list(dir).await {
            Ok(names) => status.image_count = names.len(),
            Err(err) => status.error = Some(err.to_string()),
        }

        status
    }
}

pub fn router(state: HealthState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Serve the health endpoint until the process exits.
pub async fn serve(state: HealthState) -> Result<()> {
    let addr = format!("{}:{}", state.cfg.health.bind, state.cfg.health.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log_internal!("Health check listening on http://{}/health", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health(State(state): State<HealthState>) -> Json<HealthReport> {
    let connection = state.gateway.connection().await;
    Json(HealthReport::collect(&state.cfg, &state.vstate, connection).await)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
