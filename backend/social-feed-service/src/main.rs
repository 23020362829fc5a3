use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use social_feed_service::config::{Config, StorageBackend};
use social_feed_service::db::{MemoryStore, Stores};
use social_feed_service::handlers::{self, health};
use social_feed_service::metrics::serve_metrics;
use social_feed_service::AppState;

const DEFAULT_LOG_FILTER: &str = "info,actix_web=info,sqlx=warn";

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Ok(Stores::in_memory(Arc::new(MemoryStore::new())))
        }
        StorageBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(Duration::from_secs(10))
                .connect(&config.database.url)
                .await
                .context("Failed to connect to database")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Ok(Stores::postgres(pool))
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);

    tracing::info!(
        env = %config.app.env,
        storage = %config.storage,
        page_size = config.feed.page_size,
        has_more_policy = %config.feed.has_more_policy,
        "Starting social-feed-service"
    );
    tracing::info!(features = ?config.features, "Feature flags loaded");

    let stores = build_stores(&config).await?;
    let state = web::Data::new(AppState::new(stores, config.feed, config.features));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let cors_config = config.cors.clone();
    HttpServer::new(move || {
        let mut cors = Cors::default();
        for origin in cors_config.origins() {
            if origin == "*" {
                cors = cors.allow_any_origin();
            } else {
                cors = cors.allowed_origin(origin);
            }
        }
        cors = cors.allow_any_method().allow_any_header().max_age(3600);

        App::new()
            .app_data(state.clone())
            .app_data(handlers::json_config())
            .app_data(handlers::query_config())
            .app_data(handlers::path_config())
            .wrap(cors)
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/health", web::get().to(health::health))
            .route("/ready", web::get().to(health::ready))
            .route("/metrics", web::get().to(serve_metrics))
            .configure(handlers::configure)
    })
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run()
    .await
    .context("HTTP server error")?;

    Ok(())
}
