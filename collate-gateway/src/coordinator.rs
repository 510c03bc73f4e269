//! Batch coordinator: debounce scheduling and flush dispatch
//!
//! The coordinator is the single source of truth for which senders have a
//! pending batch. Arrival of a message appends to the sender's batch and
//! restarts its debounce timer; a timer that fires without being superseded
//! detaches the batch and hands it downstream. All map and timer
//! bookkeeping happens under one mutex, and the lock is never held across
//! downstream work.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use collate_core::bus::InboundMessage;
use collate_core::config::GatewayConfig;
use collate_core::{Error, Result};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::batch::MessageBatch;
use crate::limits::UsageTracker;
use crate::processor::{BatchProcessor, MediaDisposer};
use crate::typing::TypingIndicator;

/// A batch still attached to the coordinator, with its timer bookkeeping
struct PendingBatch {
    batch: MessageBatch,
    /// Generation of the currently scheduled timer. A firing timer must
    /// present a matching generation to flush; anything else lost the race
    /// to a newer message and is a no-op.
    timer_gen: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner {
    /// At most one pending batch per sender
    pending: Mutex<HashMap<String, PendingBatch>>,
    processor: Arc<dyn BatchProcessor>,
    disposer: Option<Arc<dyn MediaDisposer>>,
    usage: Option<Arc<UsageTracker>>,
    typing: Option<TypingIndicator>,
    debounce: Duration,
    max_batch_size: usize,
    /// Source of timer generations; never reused across reschedules
    next_timer_gen: AtomicU64,
}

/// Aggregates message bursts per sender and flushes them downstream
pub struct BatchCoordinator {
    inner: Arc<Inner>,
}

impl BatchCoordinator {
    /// Create a coordinator from gateway configuration
    ///
    /// Fails only on an invalid debounce window; lifecycle operations
    /// never error outward.
    pub fn new(
        config: &GatewayConfig,
        processor: Arc<dyn BatchProcessor>,
        disposer: Option<Arc<dyn MediaDisposer>>,
        usage: Option<Arc<UsageTracker>>,
        typing: Option<TypingIndicator>,
    ) -> Result<Self> {
        if !config.debounce_window_s.is_finite() || config.debounce_window_s <= 0.0 {
            return Err(Error::Config(
                "gateway.debounce_window_s must be a positive number".to_string(),
            ));
        }

        Ok(Self {
            inner: Arc::new(Inner {
                pending: Mutex::new(HashMap::new()),
                processor,
                disposer,
                usage,
                typing,
                debounce: Duration::from_secs_f64(config.debounce_window_s),
                max_batch_size: config.max_batch_size,
                next_timer_gen: AtomicU64::new(0),
            }),
        })
    }

    /// Accept a message into the sender's pending batch
    ///
    /// Creates the batch if the sender has none, restarts the debounce
    /// timer, and flushes immediately when the size cap is reached. Never
    /// waits on downstream work.
    pub async fn submit(&self, msg: InboundMessage) {
        if msg.sender_id.trim().is_empty() || msg.chat_id.trim().is_empty() {
            warn!(channel = %msg.channel, "Dropping message with empty sender or chat id");
            return;
        }

        let sender_id = msg.sender_id.clone();

        let capped = {
            let mut pending = self.inner.pending.lock().await;

            let entry = pending.entry(sender_id.clone()).or_insert_with(|| {
                debug!(sender = %sender_id, "Opening new batch");
                PendingBatch {
                    batch: MessageBatch::new(&msg.sender_id, &msg.chat_id),
                    timer_gen: 0,
                    timer: None,
                }
            });
            entry.batch.push(msg);

            // Aborting a timer that already fired or was cancelled is a no-op
            if let Some(timer) = entry.timer.take() {
                timer.abort();
            }

            let cap = self.inner.max_batch_size;
            if cap > 0 && entry.batch.len() >= cap {
                // Cap check sits after append and before rescheduling: the
                // batch leaves now instead of waiting out the window
                pending.remove(&sender_id).map(|pb| pb.batch)
            } else {
                let gen = self.inner.next_timer_gen.fetch_add(1, Ordering::Relaxed) + 1;
                entry.timer_gen = gen;
                entry.timer = Some(self.spawn_timer(sender_id.clone(), gen));
                None
            }
        };

        if let Some(batch) = capped {
            info!(sender = %sender_id, size = batch.len(), "Batch reached size cap");
            // Dispatch on its own task so submit returns without blocking
            // on the processor
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move {
                inner.dispatch(batch).await;
            });
        }
    }

    /// Number of senders with a pending batch
    pub async fn pending_batches(&self) -> usize {
        self.inner.pending.lock().await.len()
    }

    /// Coordinator status snapshot
    pub async fn status(&self) -> serde_json::Value {
        let pending = self.inner.pending.lock().await.len();

        serde_json::json!({
            "pending_batches": pending,
            "debounce_window_s": self.inner.debounce.as_secs_f64(),
            "max_batch_size": self.inner.max_batch_size,
        })
    }

    /// Cancel all outstanding timers and drop pending batches unflushed
    pub async fn shutdown(&self) {
        let mut pending = self.inner.pending.lock().await;
        let count = pending.len();
        for (_, entry) in pending.drain() {
            if let Some(timer) = entry.timer {
                timer.abort();
            }
        }
        if count > 0 {
            info!("Shutdown discarded {} pending batches", count);
        }
    }

    fn spawn_timer(&self, sender_id: String, gen: u64) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        let delay = self.inner.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.on_timer_fire(sender_id, gen).await;
        })
    }
}

impl Inner {
    /// Flush path for an expired debounce window
    async fn on_timer_fire(&self, sender_id: String, gen: u64) {
        let flushed = {
            let mut pending = self.pending.lock().await;
            let current = matches!(
                pending.get(&sender_id),
                Some(entry) if entry.timer_gen == gen
            );
            if current {
                pending.remove(&sender_id).map(|pb| pb.batch)
            } else {
                // A newer message rescheduled, or another flush already
                // detached the batch; expected under normal operation
                debug!(sender = %sender_id, "Debounce timer superseded");
                None
            }
        };

        if let Some(batch) = flushed {
            self.dispatch(batch).await;
        }
    }

    /// Hand a detached batch downstream; runs entirely outside the lock
    async fn dispatch(&self, batch: MessageBatch) {
        let batch_id = batch.id();
        let sender_id = batch.sender_id().to_string();
        let size = batch.len();
        let extras: Vec<String> = batch.extra_attachments().to_vec();

        debug!(batch = %batch_id, sender = %sender_id, size, "Flushing batch");

        let typing_task = self
            .typing
            .as_ref()
            .map(|t| t.start(batch.chat_id().to_string()));

        match self.processor.process(batch).await {
            Ok(outcome) => {
                if let Some(usage) = &self.usage {
                    usage.record(&sender_id, outcome.tokens_used).await;
                }
            }
            Err(e) => {
                // Terminal for this batch: no retry, no requeue
                error!(sender = %sender_id, size, "Downstream processing failed: {}", e);
            }
        }

        drop(typing_task);

        if let Some(disposer) = &self.disposer {
            for media_ref in &extras {
                if let Err(e) = disposer.dispose(media_ref).await {
                    warn!(
                        sender = %sender_id,
                        media = %media_ref,
                        "Failed to dispose attachment: {}",
                        e
                    );
                }
            }
        }
    }
}
