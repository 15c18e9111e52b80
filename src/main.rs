use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use bank_api::database::{AccountStore, MemoryStore, PostgresStore};
use bank_api::{app, AppState};

#[derive(Parser)]
#[command(name = "bank-api")]
#[command(about = "Account management JSON API")]
#[command(version)]
struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    port: Option<u16>,

    #[arg(long, help = "Keep accounts in memory instead of Postgres")]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bank_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = bank_api::config::config();
    tracing::info!("Starting bank API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        tracing::warn!("JWT_SECRET is not set; account tokens can be neither issued nor verified");
    }

    let store: Arc<dyn AccountStore> = if args.in_memory {
        tracing::info!("Using in-memory account store");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(
            PostgresStore::connect(&config.database)
                .await
                .context("failed to connect to database")?,
        )
    };
    store.init().await.context("failed to initialize account table")?;

    let state = AppState::new(
        store,
        &config.security.jwt_secret,
        config.security.token_expires_at,
    );

    let mut router = app(state);
    if config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    let port = args.port.unwrap_or(config.server.port);
    let bind_addr = format!("{}:{}", config.server.host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("JSON API server listening on http://{}", bind_addr);

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
