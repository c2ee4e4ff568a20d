//! FireTrack Server - volunteer fire brigade record keeping
//!
//! REST API server for the unit's registries, events and logs.

use anyhow::Context;
use axum::{
    routing::{get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use firetrack_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{seed, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("firetrack_server={},tower_http=debug", config.logging.level).into());

    // The guard flushes the file writer on shutdown and must outlive the server
    let (file_layer, _log_guard) = match &config.logging.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "firetrack.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter)
        .with((!json).then(fmt::layer))
        .with(json.then(|| fmt::layer().json()))
        .with(file_layer)
        .init();

    tracing::info!("Starting FireTrack Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations completed");

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, &config);

    // Fill empty collections from the seed file
    if let Some(path) = &config.seed.path {
        if let Err(e) = seed::import_file(&services, Path::new(path)).await {
            tracing::warn!(path = %path, error = %e, "Seed import failed");
        }
    }

    let addr = SocketAddr::new(
        config.server.host.parse().context("Invalid host address")?,
        config.server.port,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Dashboard
        .route("/dashboard", get(api::dashboard::overview))
        // Members
        .route("/members", get(api::members::list_members).post(api::members::create_member))
        .route(
            "/members/:id",
            get(api::members::get_member)
                .put(api::members::update_member)
                .delete(api::members::delete_member),
        )
        // Vehicles
        .route("/vehicles", get(api::vehicles::list_vehicles).post(api::vehicles::create_vehicle))
        .route(
            "/vehicles/:id",
            get(api::vehicles::get_vehicle)
                .put(api::vehicles::update_vehicle)
                .delete(api::vehicles::delete_vehicle),
        )
        // Equipment
        .route("/equipment", get(api::equipment::list_equipment).post(api::equipment::create_equipment))
        .route("/equipment/backfill-keys", post(api::equipment::backfill_equipment_keys))
        .route(
            "/equipment/:id",
            get(api::equipment::get_equipment)
                .put(api::equipment::rename_equipment)
                .delete(api::equipment::delete_equipment),
        )
        // Activity categories
        .route(
            "/activity-categories",
            get(api::activities::list_categories).post(api::activities::create_category),
        )
        .route(
            "/activity-categories/:id",
            put(api::activities::rename_category).delete(api::activities::delete_category),
        )
        .route(
            "/activity-categories/:id/activities",
            post(api::activities::bulk_create_activities),
        )
        // Activities
        .route(
            "/activities",
            get(api::activities::list_activities).post(api::activities::create_activity),
        )
        .route("/activities/backfill-keys", post(api::activities::backfill_activity_keys))
        .route(
            "/activities/:id",
            get(api::activities::get_activity)
                .put(api::activities::rename_activity)
                .delete(api::activities::delete_activity),
        )
        // Events
        .route("/events", get(api::events::list_events).post(api::events::create_event))
        .route(
            "/events/:id",
            get(api::events::get_event)
                .put(api::events::update_event)
                .delete(api::events::delete_event),
        )
        .route("/events/:id/participation", put(api::events::set_participation))
        .route("/events/:id/participation/fill", post(api::events::fill_participation))
        .route("/events/:id/report", get(api::events::event_report))
        // Stock items
        .route(
            "/stock-items",
            get(api::inventory::list_stock_items).post(api::inventory::procure),
        )
        .route("/stock-items/summary", get(api::inventory::stock_summary))
        .route(
            "/stock-items/:id",
            get(api::inventory::get_stock_item)
                .put(api::inventory::update_stock_item)
                .delete(api::inventory::delete_stock_item),
        )
        // Check-outs
        .route(
            "/checkouts",
            get(api::inventory::list_checkouts).post(api::inventory::create_checkout),
        )
        .route("/checkouts/export", get(api::inventory::export_checkouts))
        .route("/checkouts/bulk", post(api::inventory::bulk_checkout))
        .route(
            "/checkouts/:id",
            get(api::inventory::get_checkout)
                .put(api::inventory::update_checkout)
                .delete(api::inventory::delete_checkout),
        )
        // Control log
        .route("/control-log", get(api::control_log::overview))
        .route("/control-log/categories", get(api::control_log::categories))
        .route("/control-log/equipment", post(api::control_log::create_equipment))
        .route(
            "/control-log/equipment/:id",
            get(api::control_log::get_equipment)
                .put(api::control_log::update_equipment)
                .delete(api::control_log::delete_equipment),
        )
        .route("/control-log/equipment/:id/entries", post(api::control_log::add_entry))
        .route(
            "/control-log/equipment/:id/entries/:entry_id",
            put(api::control_log::update_entry).delete(api::control_log::delete_entry),
        )
        // Realtime
        .route("/subscribe/:collection", get(api::realtime::subscribe))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
