//! Kasira API Server
//!
//! Main entry point for the Kasira posting and costing service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kasira_api::{AppState, create_router};
use kasira_db::connect;
use kasira_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kasira=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    info!(
        currency = %config.ledger.currency,
        "Posting accounts configured: AR {}, inventory {}, AP {}, revenue {}, COGS {}",
        config.ledger.accounts.receivable,
        config.ledger.accounts.inventory,
        config.ledger.accounts.payable,
        config.ledger.accounts.revenue,
        config.ledger.accounts.cogs,
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        ledger: Arc::new(config.ledger.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
