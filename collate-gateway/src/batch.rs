//! Batch entity: the ordered accumulation of one sender's burst

use chrono::{DateTime, Utc};
use collate_core::bus::InboundMessage;
use collate_core::{Error, Result};
use uuid::Uuid;

/// Separator between entry texts in the combined view
const ENTRY_SEPARATOR: &str = "\n---\n";

/// Ordered accumulation of messages and media references for one sender
///
/// A batch is owned by the coordinator until it is detached for flush;
/// after that it belongs exclusively to the dispatching task and is never
/// mutated again.
#[derive(Debug, Clone)]
pub struct MessageBatch {
    /// Batch identifier, for log correlation
    id: Uuid,
    /// Sender the batch groups messages for; immutable
    sender_id: String,
    /// Chat/conversation the burst came from; immutable
    chat_id: String,
    /// Messages in arrival order
    entries: Vec<InboundMessage>,
    /// Media references in arrival order
    attachments: Vec<String>,
    /// Timestamp of the first entry
    created_at: DateTime<Utc>,
}

impl MessageBatch {
    /// Create an empty batch for a sender
    pub fn new(sender_id: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sender_id: sender_id.into(),
            chat_id: chat_id.into(),
            entries: Vec::new(),
            attachments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a message, collecting its media references
    pub fn push(&mut self, msg: InboundMessage) {
        self.attachments.extend(msg.media.iter().cloned());
        self.entries.push(msg);
    }

    /// Batch identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Sender the batch belongs to
    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    /// Chat the batch belongs to
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Timestamp of the first entry
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the batch holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Messages in arrival order
    pub fn entries(&self) -> &[InboundMessage] {
        &self.entries
    }

    /// Entry texts joined in arrival order; entries without text
    /// contribute nothing
    pub fn combined_text(&self) -> String {
        self.entries
            .iter()
            .filter(|e| e.has_content())
            .map(|e| e.content.as_str())
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }

    /// The earliest-arrived message, used as the reply anchor downstream
    pub fn first_entry(&self) -> Result<&InboundMessage> {
        self.entries.first().ok_or(Error::EmptyBatch)
    }

    /// First media reference, the only one forwarded downstream
    pub fn primary_attachment(&self) -> Option<&str> {
        self.attachments.first().map(|s| s.as_str())
    }

    /// Media references beyond the first; these are only ever disposed of
    pub fn extra_attachments(&self) -> &[String] {
        if self.attachments.len() > 1 {
            &self.attachments[1..]
        } else {
            &[]
        }
    }

    /// Total number of media references
    pub fn attachment_count(&self) -> usize {
        self.attachments.len()
    }
}
