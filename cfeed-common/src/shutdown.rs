//! Graceful shutdown for the handler binaries

use tokio::signal;
use tracing::info;

/// Which signal ended the wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    CtrlC,
    Terminate,
}

impl ShutdownSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownSignal::CtrlC => "Ctrl+C",
            ShutdownSignal::Terminate => "terminate signal",
        }
    }
}

/// Wait for Ctrl+C or SIGTERM
///
/// The functions host stops custom handlers with SIGTERM.
pub async fn wait_for_signal() -> ShutdownSignal {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => ShutdownSignal::CtrlC,
        _ = terminate => ShutdownSignal::Terminate,
    }
}

/// Future for `axum::serve(..).with_graceful_shutdown`
pub async fn shutdown_signal() {
    let received = wait_for_signal().await;
    info!("Received {}, shutting down", received.as_str());
}
