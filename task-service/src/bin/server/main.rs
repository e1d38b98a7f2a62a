use std::sync::Arc;

use anyhow::Context;
use auth::Authenticator;
use auth::TokenConfig;
use sqlx::postgres::PgPoolOptions;
use task_service::config::Config;
use task_service::config::StorageBackend;
use task_service::inbound::http::router::create_router;
use task_service::outbound::repositories::InMemoryTaskRepository;
use task_service::outbound::repositories::InMemoryUserRepository;
use task_service::outbound::repositories::PostgresTaskRepository;
use task_service::outbound::repositories::PostgresUserRepository;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "task_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "task-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_seconds = config.jwt.expiration_seconds,
        public_prefixes = ?config.gate.public_prefixes,
        "Configuration loaded"
    );

    let token_config = TokenConfig::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::seconds(config.jwt.expiration_seconds),
    )
    .with_issuer(config.jwt.issuer.clone());
    let authenticator = Arc::new(Authenticator::new(token_config));

    let http_application = match config.database.backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database
                .url
                .as_deref()
                .context("database.url is required for the postgres backend")?;

            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(database_url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            create_router(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresTaskRepository::new(pg_pool)),
                Arc::clone(&authenticator),
                config.gate.public_prefixes.clone(),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");

            create_router(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTaskRepository::new()),
                Arc::clone(&authenticator),
                config.gate.public_prefixes.clone(),
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
