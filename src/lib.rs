//! Documentation of a user feedback intake service.
//!
//!
//!
//! # General Infrastructure
//! - Client POSTs feedback JSON to the public HTTPS endpoint
//! - TLS terminates at the front door, this server speaks plain HTTP behind it
//! - Single axum server, one route, one storage write per request
//! - Redis runs on the same machine with persistence enabled
//! - The service is write-only, nothing reads records back on the hot path
//!
//!
//!
//! # Notes
//!
//! ## Redis
//! Feedback records are independent blobs addressed by a generated id. Records
//! never relate to each other and are never updated, so a relational database
//! buys us nothing here. A key-value store gives O(1) puts and the record shape
//! can change without migrations.
//!
//! Durability comes from Redis persistence (AOF), which is deployment
//! configuration rather than application logic.
//!
//! ## Duplicates
//! There is no idempotency key. A client that retries a timed-out request will
//! create a second record with a fresh id. Records are cheap and append-only,
//! so duplicates are tolerated and can be weeded out offline if it ever
//! matters.
use std::time::Duration;

use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::post,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod feedback;
pub mod routes;
pub mod state;

use routes::feedback_handler;
use state::State;

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await;

    info!("Starting server...");

    let cors = CorsLayer::new()
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let app = Router::new()
        .route("/feedback", post(feedback_handler))
        .layer(cors)
        .with_state(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.unwrap();
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    println!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
