//! Binary entrypoint for the history API.

use axum::{routing::get, routing::post, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use history_api::{handlers, store, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5006".into())
    .parse()
    .expect("PORT must be a valid u16");
  let raw_commits_path =
    std::env::var("RAW_COMMITS_PATH").unwrap_or_else(|_| "data/raw_commits.json".into());

  let pool = sqlx::PgPool::connect(&database_url).await?;
  store::init_schema(&pool).await?;
  let state = Arc::new(AppState {
    pool,
    raw_commits_path,
  });

  let app = Router::new()
    .route("/health", get(handlers::health))
    .route("/api/compliance-check", post(handlers::compliance_check))
    .route("/api/risk-score", post(handlers::risk_score))
    .route("/api/save-result", post(handlers::save_result))
    .route("/api/history", get(handlers::history))
    .route("/api/feedback", post(handlers::feedback))
    .route("/api/process_commits", post(handlers::process_commits))
    .route("/api/insights", get(handlers::insights))
    .route("/api/ai_explain", post(handlers::ai_explain))
    .layer(CorsLayer::permissive())
    .with_state(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  info!("history-api listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
