use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::handler::Handler;
use crate::http::connection::Connection;

/// Accepts connections forever, serving each on its own task.
pub async fn run(cfg: Arc<Config>, handler: Arc<dyn Handler>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    serve(listener, cfg, handler).await
}

/// Runs the accept loop on an already bound listener.
pub async fn serve(
    listener: TcpListener,
    cfg: Arc<Config>,
    handler: Arc<dyn Handler>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        if let Err(e) = socket.set_nodelay(true) {
            tracing::debug!(peer = %peer, error = %e, "Could not set TCP_NODELAY");
        }

        let cfg = cfg.clone();
        let handler = handler.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, Some(peer), handler, cfg);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {:#}", peer, e);
            }
        });
    }
}
