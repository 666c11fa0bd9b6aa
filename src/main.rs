//! DevBetter web application.
//!
//! Serves the Stripe webhook endpoint and the video archive API.
//!
//! Configuration is read from `DEVBETTER__*` environment variables (and a
//! `.env` file when present), e.g.:
//!   DEVBETTER__DATABASE__URL=postgres://localhost/devbetter
//!   DEVBETTER__PAYMENT__STRIPE_API_KEY=sk_test_...
//!   DEVBETTER__PAYMENT__STRIPE_WEBHOOK_SECRET=whsec_...

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use devbetter::adapters::http::{build_router, ArchiveAppState, BillingAppState};
use devbetter::adapters::postgres::{PostgresArchiveVideoRepository, PostgresMemberRepository};
use devbetter::adapters::stripe::{StripeConfig, StripePaymentAdapter, WebhookVerifier};
use devbetter::config::AppConfig;
use devbetter::ports::SystemClock;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Server error: {}", e);
        eprintln!("devbetter: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_level, config.is_production());

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let mut stripe = StripeConfig::new(config.payment.api_key());
    if let Some(url) = &config.payment.stripe_api_base_url {
        stripe = stripe.with_base_url(url.clone());
    }
    let verifier = config.payment.webhook_secret().map(WebhookVerifier::new);
    if verifier.is_none() {
        tracing::warn!("No Stripe webhook secret configured, signatures will not be checked");
    }

    let clock = Arc::new(SystemClock);
    let billing = BillingAppState {
        member_repository: Arc::new(PostgresMemberRepository::new(pool.clone())),
        payment_provider: Arc::new(StripePaymentAdapter::new(stripe)),
        clock: clock.clone(),
        verifier,
    };
    let archive = ArchiveAppState {
        archive_repository: Arc::new(PostgresArchiveVideoRepository::new(pool.clone())),
        clock,
        ingest_token: config.archive.ingest_token(),
    };

    let app = build_router(billing, archive, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        %addr,
        environment = ?config.server.environment,
        test_mode = config.payment.is_test_mode(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    pool.close().await;
    Ok(())
}

fn init_tracing(default_filter: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Received shutdown signal");
}
