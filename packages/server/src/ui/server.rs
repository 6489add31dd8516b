//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::ChatCore;

use super::{
    handler::{get_room_messages, get_user_presence, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

pub type ServerError = Box<dyn std::error::Error + Send + Sync>;

/// WebSocket chat server
///
/// ```ignore
/// let server = Server::new(core);
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    core: ChatCore,
}

impl Server {
    pub fn new(core: ChatCore) -> Self {
        Self { core }
    }

    /// Build the axum application
    pub fn app(&self) -> Router {
        let app_state = Arc::new(AppState::from_core(&self.core));

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/health", get(health_check))
            .route("/api/rooms/{room_id}/messages", get(get_room_messages))
            .route("/api/users/{user_id}/presence", get(get_user_presence))
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), ServerError> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;
        tracing::info!("Connect to: ws://{}/ws?token=<jwt>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.app();
        let fanout_listener = self.core.broadcaster.clone().spawn_fanout_listener();

        tracing::info!(
            "Chat server (node {}) listening on {}",
            self.core.broadcaster.node_id(),
            listener.local_addr()?
        );
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        fanout_listener.abort();
        tracing::info!("Server shutdown complete");
        Ok(result?)
    }
}
