use blocos::config::env_loader::load_config;
use blocos::server::app::start_server;
use blocos::tracing::setup_loki;
use tracing::error;

#[tokio::main]
async fn main() {
    let loki = setup_loki().await;

    let config = load_config();

    if let Err(err) = start_server(config).await {
        error!("Server stopped: {}", err);
    }

    if let Some((controller, handle)) = loki {
        controller.shutdown().await;
        let _ = handle.await;
    }
}
