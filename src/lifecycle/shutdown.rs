//! Shutdown coordination for the gateway.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Holds a broadcast channel; long-running tasks subscribe and stop when a
/// trigger arrives. The server also stops on Ctrl-C via [`wait_for_signal`].
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Completes when the process receives Ctrl-C.
///
/// If the handler cannot be installed the future never resolves, leaving
/// the coordinator trigger as the only shutdown path.
pub async fn wait_for_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %error, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        shutdown.trigger();
        assert!(rx.recv().await.is_ok());
    }

    #[tokio::test]
    async fn late_subscribers_wait_for_next_trigger() {
        let shutdown = Shutdown::new();
        let mut rx = shutdown.subscribe();
        tokio::select! {
            _ = rx.recv() => panic!("no trigger was sent"),
            _ = tokio::time::sleep(std::time::Duration::from_millis(10)) => {}
        }
    }
}
