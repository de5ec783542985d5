//! HTTP server lifecycle

use tokio::net::TcpListener;

use crate::api;
use crate::core::error::Result;
use crate::core::state::ServerState;

pub struct Server {
    state: ServerState,
}

impl Server {
    pub fn with_state(state: ServerState) -> Self {
        Self { state }
    }

    /// Bind the listener and serve until shutdown is requested
    pub async fn run(self) -> Result<()> {
        let port = self.state.config().http_port;
        let router = api::create_router(self.state);

        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        tracing::info!("listening on 0.0.0.0:{}", port);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("shutdown signal received");
}
