// ── Snapshot subscriptions ──
//
// Subscription handle for consuming wholesale snapshot replacements
// from the DataStore.

use std::sync::Arc;

use tokio::sync::watch;

/// A subscription to a value the `DataStore` replaces as a whole.
///
/// Provides point-in-time access plus change notification via
/// [`changed()`](Self::changed).
pub struct SnapshotStream<T: Send + Sync + 'static> {
    current: Arc<T>,
    receiver: watch::Receiver<Arc<T>>,
}

impl<T: Send + Sync + 'static> SnapshotStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time or by the last `changed()`.
    pub fn current(&self) -> &Arc<T> {
        &self.current
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` if the DataStore has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }
}
