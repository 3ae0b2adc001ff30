use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use testdeck_api::config::config;
use testdeck_api::database::manager::DatabaseManager;
use testdeck_api::handlers;
use testdeck_api::middleware::api_key_middleware;

#[derive(Parser)]
#[command(name = "testdeck-api", version, about = "Testdeck platform backend API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply pending database migrations, then exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_API_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Migrate => {
            DatabaseManager::run_migrations().await?;
            Ok(())
        }
    }
}

async fn serve() -> anyhow::Result<()> {
    let config = config();
    tracing::info!("Starting Testdeck API in {:?} mode", config.environment);

    if config.security.api_key.is_empty() {
        tracing::warn!("SECURITY_API_KEY is not set; /api routes will refuse requests");
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TESTDECK_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Testdeck API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")
}

fn app() -> Router {
    let config = config();

    // Every entity controller sits behind the API-key gate
    let protected = Router::new()
        .merge(handlers::projects::routes())
        .merge(handlers::scenarios::routes())
        .merge(handlers::assets::routes())
        .merge(handlers::documents::routes())
        .merge(handlers::plans::routes())
        .merge(handlers::pages::routes())
        .merge(handlers::reviews::routes())
        .merge(handlers::terms::routes())
        .merge(handlers::privacy_policies::routes())
        .route_layer(axum::middleware::from_fn(api_key_middleware));

    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(protected)
        // Global middleware, outermost first
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer())
                .layer(axum::extract::DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app
}

fn cors_layer() -> CorsLayer {
    let security = &config().security;

    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Testdeck API",
            "version": version,
            "description": "Backend API for the Testdeck collaborative testing platform",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "projects": "/api/projects[/:id] (protected)",
                "scenarios": "/api/scenarios[/:id] (protected)",
                "assets": "/api/assets[/:id] (protected)",
                "documents": "/api/documents[/:id] (protected)",
                "plans": "/api/plans[/:id] (protected)",
                "pages": "/api/pages[/:id], /api/pages/slug/:slug (protected)",
                "reviews": "/api/reviews[/:id] (protected)",
                "terms": "/api/terms[/:id], /api/terms/current (protected)",
                "privacy_policies": "/api/privacy-policies[/:id], /api/privacy-policies/current (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            // Connection details stay in the logs, not the response
            tracing::error!("Health check failed: {}", e);
            (
                axum::http::StatusCode::SERVICE_UNAVAILABLE,
                axum::response::Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database": "unreachable"
                    }
                })),
            )
        }
    }
}
