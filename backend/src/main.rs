use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod api;
mod domain;
mod rest;

use api::HttpSchoolApi;
use domain::status::StatusService;
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let upstream = std::env::var("SCHOOL_API_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_string());
    info!("Using school API at {}", upstream);

    let school_api = Arc::new(HttpSchoolApi::new(upstream)?);
    let state = AppState::new(StatusService::new(school_api));

    // CORS setup to allow the web client to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/status", get(rest::get_status))
        .route("/status/groups/:group_id/table", get(rest::get_group_table));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
