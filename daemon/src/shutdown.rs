//! Stops the lookup server on SIGINT or SIGTERM.

use std::future::Future;

use tokio::signal;
use tokio::sync::broadcast;

/// Hands out "stop now" futures and fires them all at once.
#[derive(Clone)]
pub struct ShutdownController {
    tx: broadcast::Sender<()>,
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Resolves once [`trigger`](Self::trigger) has been called. Suitable as
    /// the graceful-shutdown future of `RpcServer::start`.
    pub fn notified(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.tx.subscribe();
        async move {
            let _ = rx.recv().await;
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Wait for Ctrl-C or SIGTERM, then trigger.
    pub async fn trigger_on_signal(self) {
        let ctrl_c = signal::ctrl_c();

        #[cfg(unix)]
        let terminate = async {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    sigterm.recv().await;
                }
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable: {e}");
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => tracing::info!("interrupted, stopping lookup server"),
            _ = terminate => tracing::info!("terminated, stopping lookup server"),
        }
        self.trigger();
    }
}
