//! Shutdown coordination.

use tokio::sync::broadcast;

/// Fan-out shutdown signal for the server and its background tasks.
#[derive(Debug, Clone)]
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

    /// Notify every subscriber. Returns how many were listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once `rx` fires or its sender is gone.
pub async fn wait(mut rx: broadcast::Receiver<()>) {
    let _ = rx.recv().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let a = shutdown.subscribe();
        let b = shutdown.subscribe();
        assert_eq!(shutdown.trigger(), 2);
        wait(a).await;
        wait(b).await;
    }

    #[test]
    fn test_trigger_without_subscribers() {
        assert_eq!(Shutdown::new().trigger(), 0);
    }
}
