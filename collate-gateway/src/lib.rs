//! Debounce batching gateway
//!
//! Aggregates rapid bursts of inbound messages per sender into a single
//! batch and hands completed batches to the downstream processor. A batch
//! is complete when its sender has been quiet for the debounce window, or
//! earlier when it hits the configured size cap.

pub mod batch;
pub mod coordinator;
pub mod ingest;
pub mod limits;
pub mod processor;
pub mod typing;

pub use batch::MessageBatch;
pub use coordinator::BatchCoordinator;
pub use ingest::IngestPump;
pub use limits::{UsageStats, UsageTracker};
pub use processor::{BatchProcessor, MediaDisposer, ProcessOutcome};
pub use typing::{TypingCallback, TypingIndicator, TypingTask};
