//! Ingest pump: drains the message bus into the coordinator

use std::sync::Arc;

use collate_core::bus::MessageBus;
use collate_core::{Error, Result};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::coordinator::BatchCoordinator;

/// Moves inbound messages from the bus into the batch coordinator
///
/// Channels publish to the bus; the pump is the only consumer and feeds
/// every message through `BatchCoordinator::submit`.
pub struct IngestPump {
    bus: MessageBus,
    coordinator: Arc<BatchCoordinator>,
    running: Arc<RwLock<bool>>,
}

impl IngestPump {
    /// Create a new pump over a bus and coordinator
    pub fn new(bus: MessageBus, coordinator: Arc<BatchCoordinator>) -> Self {
        Self {
            bus,
            coordinator,
            running: Arc::new(RwLock::new(false)),
        }
    }

    /// Run the pump until the bus closes or `stop` is called
    pub async fn run(&self) -> Result<()> {
        let Some(mut inbound_rx) = self.bus.take_inbound_receiver().await else {
            error!("Failed to take inbound receiver");
            return Err(Error::Channel("Inbound receiver already taken".to_string()));
        };

        *self.running.write().await = true;
        info!("Ingest pump started");

        while *self.running.read().await {
            match tokio::time::timeout(std::time::Duration::from_secs(1), inbound_rx.recv()).await
            {
                Ok(Some(msg)) => {
                    debug!("Received message from {}:{}", msg.channel, msg.chat_id);
                    self.coordinator.submit(msg).await;
                }
                Ok(None) => {
                    info!("Message bus closed, stopping ingest pump");
                    break;
                }
                Err(_) => {
                    // Timeout, re-check the running flag
                    continue;
                }
            }
        }

        info!("Ingest pump stopped");
        Ok(())
    }

    /// Ask the pump to stop after the current poll
    pub async fn stop(&self) {
        *self.running.write().await = false;
    }

    /// Whether the pump is running
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{BatchProcessor, ProcessOutcome};
    use async_trait::async_trait;
    use collate_core::bus::InboundMessage;
    use collate_core::config::GatewayConfig;
    use crate::batch::MessageBatch;

    struct NullProcessor;

    #[async_trait]
    impl BatchProcessor for NullProcessor {
        async fn process(&self, _batch: MessageBatch) -> Result<ProcessOutcome> {
            Ok(ProcessOutcome::default())
        }
    }

    fn pump() -> (IngestPump, MessageBus, Arc<BatchCoordinator>) {
        let bus = MessageBus::new();
        let coordinator = Arc::new(
            BatchCoordinator::new(
                &GatewayConfig::default(),
                Arc::new(NullProcessor),
                None,
                None,
                None,
            )
            .unwrap(),
        );
        let pump = IngestPump::new(bus.clone(), Arc::clone(&coordinator));
        (pump, bus, coordinator)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pump_feeds_coordinator() {
        let (pump, bus, coordinator) = pump();

        bus.publish_inbound(InboundMessage::new("test", "user1", "chat1", "hello"))
            .unwrap();
        bus.publish_inbound(InboundMessage::new("test", "user2", "chat2", "hi"))
            .unwrap();

        let pump = Arc::new(pump);
        let pump_ref = Arc::clone(&pump);
        let task = tokio::spawn(async move { pump_ref.run().await });

        // Let the pump drain both messages, then stop it
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(coordinator.pending_batches().await, 2);

        pump.stop().await;
        task.await.unwrap().unwrap();
        coordinator.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_terminates_run() {
        let (pump, _bus, _coordinator) = pump();
        let pump = Arc::new(pump);

        let pump_ref = Arc::clone(&pump);
        let task = tokio::spawn(async move { pump_ref.run().await });

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert!(pump.is_running().await);

        pump.stop().await;
        task.await.unwrap().unwrap();
        assert!(!pump.is_running().await);
    }

    #[tokio::test]
    async fn test_receiver_can_only_be_taken_once() {
        let (pump, bus, _coordinator) = pump();
        bus.take_inbound_receiver().await.unwrap();

        assert!(pump.run().await.is_err());
    }
}
