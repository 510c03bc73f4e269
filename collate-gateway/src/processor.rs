//! Collaborator seams for flushed batches

use async_trait::async_trait;
use collate_core::Result;

use crate::batch::MessageBatch;

/// Result of a downstream processor invocation
#[derive(Debug, Clone, Default)]
pub struct ProcessOutcome {
    /// Tokens consumed by downstream processing, fed into per-sender
    /// usage accounting
    pub tokens_used: u64,
}

/// Consumer of completed batches
///
/// Invoked exactly once per flushed batch, outside the coordinator's lock.
/// Failures are contained by the coordinator: logged, never retried, the
/// batch is discarded.
#[async_trait]
pub trait BatchProcessor: Send + Sync {
    /// Process a detached batch
    async fn process(&self, batch: MessageBatch) -> Result<ProcessOutcome>;
}

/// Removes media that will not be forwarded downstream
///
/// Called for every attachment beyond a flushed batch's first; failures
/// are logged and never affect the processing outcome.
#[async_trait]
pub trait MediaDisposer: Send + Sync {
    /// Dispose of a single media reference
    async fn dispose(&self, media_ref: &str) -> Result<()>;
}
