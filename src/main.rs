mod auth;
mod config;
mod db;
mod error;
mod geo;
mod models;
mod routes;
mod state;

use axum::Router;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::{Command, Config};
use crate::db::Db;
use crate::state::AppState;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn readyz(db: Db) -> impl IntoResponse {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, "ready"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("jobboard=info,tower_http=info")),
        )
        .init();

    let config = Config::parse();

    tracing::info!("Connecting to database...");
    let db = db::connect(&config.mongodb_uri, &config.database_name).await?;

    match config.resolved_command() {
        Command::CreateIndexes => {
            tracing::info!("Recreating full-text search indexes...");
            db.recreate_search_indexes().await?;
            tracing::info!("Indexes ready");
        }
        Command::Serve { listen_addr } => {
            if config.ensure_indexes {
                tracing::info!("Ensuring database indexes...");
                db.ensure_indexes().await?;
            }

            let state = AppState::new(db.clone(), config.session_ttl_hours);
            let readyz_db = db.clone();
            let app = Router::new()
                .route("/healthz", get(healthz))
                .route("/readyz", get(move || readyz(readyz_db.clone())))
                .merge(routes::ui::router(state.clone()))
                .merge(routes::api::router(state))
                .layer(
                    ServiceBuilder::new()
                        .layer(TraceLayer::new_for_http())
                        .layer(CorsLayer::permissive()),
                );

            let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
            tracing::info!("Listening on {listen_addr}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
