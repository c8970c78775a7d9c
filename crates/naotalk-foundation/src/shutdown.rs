//! Cooperative shutdown signalling.
//!
//! The handler owns the trigger side of a watch channel; any number of
//! `ShutdownToken` clones can observe it. Sessions select on the token
//! between poll ticks so an interrupt is seen before the next tick.

use tokio::sync::watch;
use tracing::info;

/// Owns the shutdown trigger. Created once per process.
pub struct ShutdownHandler {
    tx: watch::Sender<bool>,
}

impl Default for ShutdownHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandler {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Spawn a task that triggers shutdown on SIGINT (Ctrl+C).
    pub fn install(self) -> Self {
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received SIGINT, requesting shutdown");
                let _ = tx.send(true);
            }
        });
        self
    }

    /// Request shutdown programmatically.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Wait until shutdown has been requested.
    pub async fn wait(&self) {
        self.token().cancelled().await;
    }
}

/// Cheap observer handle for shutdown state.
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown is requested. A dropped handler counts as a
    /// request so waiters unwind instead of hanging.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn token_observes_trigger() {
        let handler = ShutdownHandler::new();
        let token = handler.token();
        assert!(!token.is_cancelled());

        handler.trigger();
        assert!(token.is_cancelled());
        // Must resolve promptly once triggered.
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("cancelled() should resolve after trigger");
    }

    #[tokio::test]
    async fn dropped_handler_releases_waiters() {
        let handler = ShutdownHandler::new();
        let token = handler.token();
        drop(handler);
        tokio::time::timeout(Duration::from_secs(1), token.cancelled())
            .await
            .expect("cancelled() should resolve when the handler is gone");
    }
}
