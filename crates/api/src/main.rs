//! Treadstock API server

use anyhow::Context;

use treadstock_api::{email::EmailService, routes, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = treadstock_shared::db::create_pool(
        &config.database_url,
        config.database_max_connections,
    )
    .await
    .context("Failed to connect to database")?;

    treadstock_shared::db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let email = EmailService::from_env();
    if !email.is_enabled() {
        tracing::warn!("RESEND_API_KEY is not set; outgoing email is disabled");
    }

    let bind_address = config.bind_address.clone();
    let state = AppState::new(pool, config, email);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!(address = %bind_address, "Treadstock API listening");

    axum::serve(listener, app)
        .await
        .context("Server terminated")?;

    Ok(())
}
