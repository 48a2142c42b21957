//! JWT Auth Server
//! Mission: Register users, issue access tokens, guard protected routes

use anyhow::{Context, Result};
use clap::Parser;
use jwt_auth_server::{auth_state_from_config, build_router, config, Config};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    config::load_env();
    init_tracing();

    let config = Config::parse();
    config.validate().context("Invalid configuration")?;

    info!("🚀 JWT Auth Server starting");

    if config.uses_dev_secret() {
        warn!("⚠️  ACCESS_TOKEN_SECRET not set - using development secret. SET IT IN PRODUCTION!");
    }
    match config.token_ttl() {
        Some(ttl) => info!("🔐 Access tokens expire after {}s", ttl.as_secs()),
        None => warn!("⚠️  TOKEN_TTL_SECS not set - issued tokens never expire"),
    }
    info!(
        "🔐 bcrypt cost {}, duplicate usernames: {:?}",
        config.bcrypt_cost,
        config.duplicate_policy()
    );

    let state = auth_state_from_config(&config);
    let app = build_router(state);

    // Start server
    let (host, port) = config.bind_target();
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;
    info!("🎯 Server is running on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwt_auth_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
