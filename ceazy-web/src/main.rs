//! ceazy-web - storefront backend for the CEAZY site
//!
//! Serves the album catalog and creates payment processor checkout
//! sessions for released albums. Catalog data is memory-resident and
//! reseeded on restart.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use ceazy_common::config::{Config, Overrides};
use ceazy_common::CatalogStore;
use ceazy_web::payment::StripeCheckout;
use ceazy_web::{build_router, AppState};

/// Command-line options (highest-priority configuration layer)
#[derive(Debug, Parser)]
#[command(name = "ceazy-web", about = "CEAZY storefront backend", version)]
struct Cli {
    /// Address to listen on (e.g. 0.0.0.0:5780)
    #[arg(long)]
    bind_addr: Option<String>,

    /// Public origin used for checkout redirect URLs
    #[arg(long)]
    public_origin: Option<String>,

    /// ISO currency code for checkout sessions
    #[arg(long)]
    currency: Option<String>,

    /// Payment processor secret key
    #[arg(long)]
    stripe_secret_key: Option<String>,

    /// Seed the catalog at startup (true) or on first request (false)
    #[arg(long)]
    seed_on_startup: Option<bool>,

    /// Path to a TOML config file
    #[arg(long)]
    config_file: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification IMMEDIATELY after tracing init
    info!(
        "Starting CEAZY storefront (ceazy-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();

    // A missing processor secret must abort here, not at first request
    let config = Config::load(Overrides {
        bind_addr: cli.bind_addr,
        public_origin: cli.public_origin,
        currency: cli.currency,
        stripe_secret_key: cli.stripe_secret_key,
        seed_on_startup: cli.seed_on_startup,
        config_file: cli.config_file,
    })?;

    let checkout = StripeCheckout::new(config.stripe_secret_key.clone())
        .map_err(|e| anyhow::anyhow!("failed to build checkout client: {e}"))?;
    let store = Arc::new(CatalogStore::new());

    if config.seed_on_startup {
        // Seeding stays retryable on the next request, so log and go on
        match store.all_albums().await {
            Ok(albums) => info!(count = albums.len(), "✓ Catalog seeded"),
            Err(e) => error!("Catalog seeding failed (will retry on first request): {e}"),
        }
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(store, Arc::new(checkout), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("ceazy-web listening on http://{bind_addr}");
    info!("Health check: http://{bind_addr}/health");

    axum::serve(listener, app).await?;

    Ok(())
}
