//! Webhook server lifecycle.
//!
//! ```text
//! stopped → starting (bind) → running (serve) → stopping (release) → stopped
//! ```
//!
//! [`WebhookServer::bind`] and [`BoundServer::serve`] are separate so callers
//! can learn the bound address (e.g. port 0 in tests) before serving.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use crate::bot::VoteHandler;
use crate::error::ServerError;
use crate::web::{router, AppState};
use crate::Config;

/// A configured, not yet bound, webhook server.
pub struct WebhookServer {
    config: Config,
    bot: Option<Arc<dyn VoteHandler>>,
}

impl WebhookServer {
    pub fn new(config: Config) -> Self {
        Self { config, bot: None }
    }

    /// Attach the bot that receives votes. Without one, votes are only logged.
    pub fn with_vote_handler(mut self, bot: Arc<dyn VoteHandler>) -> Self {
        self.bot = Some(bot);
        self
    }

    /// Address the server listens on: all interfaces, configured port.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.config.port))
    }

    /// Bind the listener and register routes.
    pub async fn bind(self) -> Result<BoundServer, ServerError> {
        let addr = self.bind_addr();
        info!(
            address = %addr,
            vote_handler_attached = self.bot.is_some(),
            "webhook_server_starting"
        );

        let bind_err = |source: std::io::Error| {
            error!(address = %addr, error = %source, "webhook_server_bind_failed");
            info!(address = %addr, "webhook_server_cleaned_up");
            ServerError::Bind { addr, source }
        };

        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;

        Ok(BoundServer {
            listener,
            local_addr,
            app: router(AppState::new(self.config, self.bot)),
        })
    }

    /// Bind, then serve until SIGINT/SIGTERM.
    pub async fn run(self) -> Result<(), ServerError> {
        self.bind().await?.serve(shutdown_signal()).await
    }
}

/// A server holding a bound listener, ready to accept requests.
pub struct BoundServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    app: Router,
}

impl BoundServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until `shutdown` completes.
    ///
    /// In-flight requests finish before returning. The listener is released
    /// whether serving ended cleanly or with an error.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Self {
            listener,
            local_addr,
            app,
        } = self;

        info!(address = %local_addr, "webhook_server_listening");

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve);

        if let Err(e) = &result {
            error!(error = %e, "webhook_server_failed");
        }

        info!(address = %local_addr, "webhook_server_cleaned_up");

        result
    }
}

/// Create a future that completes when a shutdown signal is received.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "ctrl_c_handler_install_failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "sigterm_handler_install_failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("webhook_server_shutting_down");
}
