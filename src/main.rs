use std::sync::Arc;

use httplet::config::Config;
use httplet::handler::EchoHandler;
use httplet::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Arc::new(Config::load()?);
    let handler = Arc::new(EchoHandler::new(cfg.server_name.clone()));

    tokio::select! {
        res = server::listener::run(cfg.clone(), handler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
