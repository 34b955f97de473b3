mod config;
mod context;
mod event;
#[cfg(test)]
mod fixtures;
mod handler;
mod health;
mod helper;
mod image_set;
mod logging;
mod picker;
mod plugin;
mod recency;
mod upload;
mod volatile_state;

use serenity::all::{GatewayIntents, ShardManager};
use std::{sync::Arc, time::Duration};
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A `.env` file is optional; real environment variables take precedence.
    dotenvy::dotenv().ok();

    let cfg = crate::config::Config::load().await?;
    crate::image_set::ensure_dir(&cfg.general.image_folder).await?;
    log_internal!(
        "Image folder verified: {}",
        cfg.general.image_folder.to_string_lossy()
    );

    let cfg = Arc::new(cfg);
    let vstate = Arc::new(RwLock::new(crate::volatile_state::VolatileState::new(
        cfg.images.history_capacity,
    )));
    let handler = handler::Handler::new(cfg.clone(), vstate.clone());

    // Things we want discord to tell us about.
    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::Client::builder(&cfg.general.discord_token, intents)
        .event_handler(handler)
        .await?;

    if cfg.health.enabled {
        let state = health::HealthState {
            cfg: cfg.clone(),
            vstate: vstate.clone(),
            gateway: client.shard_manager.clone(),
        };
        tokio::spawn(async move {
            // The bot itself keeps working without the endpoint
            if let Err(err) = health::serve(state).await {
                log_error!("Health check server stopped: {}", err);
            }
        });
    }

    if cfg.logging.heartbeat_seconds > 0 {
        tokio::spawn(heartbeat(Duration::from_secs(cfg.logging.heartbeat_seconds)));
    }

    tokio::spawn(shutdown_on_signal(client.shard_manager.clone()));

    log_internal!("Connecting to Discord...");

    // An invalid token or an invalidated session ends up here.  Reconnecting with a bad
    // credential cannot recover, so exit.
    client.start().await.map_err(|err| {
        log_error!("Discord client stopped: {}", err);
        err.into()
    })
}

async fn heartbeat(period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately
    interval.tick().await;
    loop {
        interval.tick().await;
        log_internal!("Still running: {}", chrono::Utc::now().to_rfc3339());
    }
}

async fn shutdown_on_signal(shard_manager: Arc<ShardManager>) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                log_error!("Could not listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate => {}
    }

    log_internal!("Shutdown requested, closing Discord connection...");
    shard_manager.shutdown_all().await;
}
