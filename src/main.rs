use std::{error::Error, net::SocketAddr, sync::Arc};

use axum::Router;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tracing_subscriber::EnvFilter;

use school_api::{
    auth::token::TokenService,
    cache::CacheClient,
    config::{AppConfig, RateLimitConfig, StorageBackend},
    create_router, db,
    store::{MemoryStore, PgStore},
    AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("school_api=info,tower_http=info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("School API - Starting...");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        tracing::error!("School API failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn Error>> {
    let tokens = TokenService::new(config.jwt_secret.clone());
    let cache = connect_cache(&config).await;

    let state = match config.storage {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or("DATABASE_URL must be set when STORAGE_BACKEND=postgres")?;

            tracing::info!("Connecting to database...");
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;

            AppState::new(Arc::new(PgStore::new(pool)), tokens, cache, config.storage)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            AppState::new(Arc::new(MemoryStore::new()), tokens, cache, config.storage)
        }
    };

    let app = rate_limited(create_router(state), &config.rate_limit)?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("School API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    // Client IPs feed the rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("School API stopped");
    Ok(())
}

/// Per-client-IP limiter; needs `ConnectInfo<SocketAddr>` on every request
fn rate_limited(router: Router, limits: &RateLimitConfig) -> Result<Router, Box<dyn Error>> {
    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(limits.replenish_ms)
        .burst_size(limits.burst)
        .finish()
        .ok_or("RATE_LIMIT_BURST and RATE_LIMIT_REPLENISH_MS must be greater than zero")?;

    Ok(router.layer(GovernorLayer {
        // Built once for the lifetime of the process
        config: Box::leak(Box::new(governor_conf)),
    }))
}

/// Redis is optional; an unreachable cache only degrades /health
async fn connect_cache(config: &AppConfig) -> Option<CacheClient> {
    let url = config.cache_url.as_deref()?;

    match CacheClient::connect(url, config.cache_prefix.clone()).await {
        Ok(client) => {
            tracing::info!("Connected to cache");
            Some(client)
        }
        Err(e) => {
            tracing::warn!("Cache unavailable, continuing without it: {}", e);
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}
