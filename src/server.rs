use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tracing::info;

use crate::config::Config;
use crate::store::PostStore;
use crate::webhook::{self, IngestSettings};

/// Shared state handed to every handler. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PostStore>,
    pub settings: IngestSettings,
}

impl AppState {
    pub fn new(config: &Config, store: Arc<dyn PostStore>) -> Self {
        Self {
            store,
            settings: IngestSettings {
                allowed_chat_id: config.telegram.channel_id,
                accept_direct_messages: config.telegram.accept_direct_messages,
            },
        }
    }
}

pub fn router(state: AppState, test_insert_route: bool) -> Router {
    let mut app = Router::new()
        .route("/", get(webhook::liveness))
        .route("/telegram/webhook", post(webhook::telegram_webhook));

    if test_insert_route {
        app = app.route("/test-insert", get(webhook::test_insert));
    }

    app.with_state(state)
}

/// Bind and serve until Ctrl-C or SIGTERM.
pub async fn run(config: &Config, store: Arc<dyn PostStore>) -> Result<()> {
    let state = AppState::new(config, store);
    let app = router(state, config.debug.test_insert_route);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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

    info!("Shutdown signal received");
}
