use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use librarium::domain::SystemClock;
use librarium::infrastructure::AppState;
use librarium::{api, config, db, import, seed};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "librarium=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize database
    let db = db::init_db(&config.database_url)
        .await
        .expect("Failed to initialize database");

    // Make sure a fresh database has staff accounts to log in with
    if let Err(e) = seed::ensure_default_users(&db).await {
        tracing::error!("Failed to seed default users: {}", e);
    }

    // Optional bulk load of the legacy catalog files
    if let Some(dir) = &config.import_dir {
        tracing::info!("Importing catalog from {}", dir);
        if let Err(e) = import::import_catalog(&db, Path::new(dir)).await {
            tracing::error!("Catalog import failed: {}", e);
        }
    }

    let state = AppState::new(db, config.policy.clone(), Arc::new(SystemClock));

    // Bring fine records up to date before taking traffic, the way the
    // desktop app refreshed at session start.
    match state.fine_engine.refresh_fines().await {
        Ok(summary) => tracing::info!(
            created = summary.created,
            updated = summary.updated,
            "startup fine refresh"
        ),
        Err(e) => tracing::error!("Startup fine refresh failed: {}", e),
    }

    let mut cors_allowed_origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        match origin.parse::<axum::http::HeaderValue>() {
            Ok(v) => cors_allowed_origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    let app = Router::new()
        .nest("/api", api::api_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors_allowed_origins)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("librarium server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
