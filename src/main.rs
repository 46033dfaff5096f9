use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pickem::{build_router, AppConfig, AppState, InMemoryStore, PostgresStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pickem=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting pick'em scoring server");

    let config = AppConfig::from_env();

    // Create shared application state with dependency injection
    let app_state = match &config.database_url {
        Some(database_url) => {
            let store = PostgresStore::connect(
                database_url,
                config.max_connections,
                config.run_migrations,
            )
            .await?;
            info!("Using PostgreSQL store");
            AppState::from_store(Arc::new(store), config.finalize_policy)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on restart");
            AppState::from_store(Arc::new(InMemoryStore::new()), config.finalize_policy)
        }
    };

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(bind_addr = %config.bind_addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
