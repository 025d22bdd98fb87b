//! Shutdown coordination.

use tokio::sync::broadcast;

/// Broadcasts a single "stop accepting" signal to the server loop and any
/// other long-running task that subscribes.
///
/// Receivers see the channel close if this is dropped, which they treat the
/// same as a trigger, so keep it alive for as long as the server should run.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the signal. Triggering with no subscribers is a no-op.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
