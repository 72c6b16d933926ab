use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vend_api::{app, AppState};
use vend_catalog::Catalog;
use vend_currency::Ledger;
use vend_store::{DbClient, PgCurrencyRepository, PgProductRepository, PgVariantRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vend_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = vend_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Vend API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .context("Failed to connect to Postgres")?;
    db.migrate().await.context("Failed to run migrations")?;

    let ledger = Arc::new(Ledger::new(Arc::new(PgCurrencyRepository::new(
        db.pool.clone(),
    ))));
    let catalog = Arc::new(Catalog::new(
        Arc::new(PgProductRepository::new(db.pool.clone())),
        Arc::new(PgVariantRepository::new(db.pool.clone())),
    ));

    let app_state = AppState::new(ledger, catalog);
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
