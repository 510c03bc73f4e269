//! Activity indicator shown while a batch is processed downstream

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Callback invoked with the chat id on every typing refresh
pub type TypingCallback = Arc<
    dyn Fn(String) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send>>
        + Send
        + Sync,
>;

/// Periodically re-sends a typing/activity signal for a chat
///
/// Chat platforms drop the typing status after a few seconds, so it has to
/// be refreshed for as long as downstream processing runs.
pub struct TypingIndicator {
    callback: TypingCallback,
    interval: Duration,
}

impl TypingIndicator {
    /// Create a new indicator with a refresh interval in seconds
    pub fn new(callback: TypingCallback, interval_s: u64) -> Self {
        Self {
            callback,
            interval: Duration::from_secs(interval_s),
        }
    }

    /// Start refreshing the indicator for a chat until the returned task
    /// is stopped or dropped
    pub fn start(&self, chat_id: String) -> TypingTask {
        let callback = Arc::clone(&self.callback);
        let interval = self.interval;

        let handle = tokio::spawn(async move {
            loop {
                (callback)(chat_id.clone()).await;
                tokio::time::sleep(interval).await;
            }
        });

        TypingTask { handle }
    }
}

/// Handle to a running typing refresh loop; aborts the loop on drop
pub struct TypingTask {
    handle: JoinHandle<()>,
}

impl TypingTask {
    /// Stop the refresh loop
    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for TypingTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
