//! vigil - guild-protection bot for Discord.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vigil::config::Config;
use vigil::state::GuardState;
use vigil::{gateway, http, metrics};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    let token = match config.bot.token.clone() {
        Some(token) => token,
        None => std::env::var("DISCORD_TOKEN").map_err(|_| {
            anyhow::anyhow!("no bot token: set bot.token in config or the DISCORD_TOKEN env var")
        })?,
    };

    info!(
        owner = config.bot.owner_id,
        prefix = %config.bot.prefix,
        log_channel = %config.guard.log_channel_name,
        "Starting vigil"
    );

    let config = Arc::new(config);
    let state = Arc::new(GuardState::new(config.bot.owner()));

    // Keep-alive/metrics HTTP endpoint is optional.
    // Convention: port = 0 disables it (used by tests).
    if config.http.port == 0 {
        info!("Keep-alive HTTP endpoint disabled");
    } else {
        metrics::init();
        let port = config.http.port;
        tokio::spawn(async move {
            http::run_http_server(port).await;
        });
        info!(port, "Keep-alive HTTP endpoint started");
    }

    // Cooldown table eviction task (runs every minute)
    {
        let state = Arc::clone(&state);
        let window = config.guard.cooldown_secs;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
            loop {
                interval.tick().await;
                let now = chrono::Utc::now().timestamp();
                let removed = state.prune_cooldowns(now, window);
                if removed > 0 {
                    info!(removed, "Expired cooldown entries removed");
                }
            }
        });
    }
    info!("Cooldown eviction task started");

    gateway::run(config, state, &token).await
}
