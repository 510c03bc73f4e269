//! Message bus for decoupled communication
//!
//! The message bus carries inbound messages from chat channels to the
//! gateway, decoupling transport handlers from batching.

pub mod events;
pub mod queue;

pub use events::InboundMessage;
pub use queue::MessageBus;
