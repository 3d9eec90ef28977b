use super::routes::{
    blocos_handler, cities_handler, event_page_handler, event_types_handler, events_handler,
    health_handler, search_handler, suggestions_handler,
};
use super::state::AppState;
use crate::config::model::Config;
use axum::http::{header::CONTENT_TYPE, Method};
use axum::routing::get;
use axum::Router;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/events", get(events_handler))
        .route("/api/blocos", get(blocos_handler))
        .route("/api/cities", get(cities_handler))
        .route("/api/search", get(search_handler).post(suggestions_handler))
        .route("/api/event-types", get(event_types_handler))
        .fallback(event_page_handler)
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: Config) -> io::Result<()> {
    let app = router(AppState::new(&config));

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(err) => {
                warn!("Couldn't listen for Ctrl+C: {}", err);
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
