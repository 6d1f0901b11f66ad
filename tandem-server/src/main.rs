use anyhow::Context;
use axum::{Router, routing::get};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tandem_server::{AppState, RelayService, RoomRegistry, WsClients, ws_handler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let bind = env::var("TANDEM_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_owned());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid TANDEM_BIND address: {bind}"))?;

    let registry = Arc::new(RoomRegistry::new());
    let clients = Arc::new(WsClients::new());
    let relay = RelayService::new(registry.clone(), clients.clone());

    let state = AppState {
        relay,
        clients,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/ws/{peer_id}", get(ws_handler))
        .layer(cors)
        .with_state(state);

    info!("signaling relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // In-flight sessions cannot survive a restart; drop all room state.
    registry.clear();
    info!("relay stopped");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
