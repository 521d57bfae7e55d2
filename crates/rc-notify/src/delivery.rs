//! Handing rendered messages to recipients.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use rc_core::EntityId;
use serde::{Deserialize, Serialize};

/// Per-message options passed through to the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageOptions {
    /// The message is a roll result.
    pub roll: bool,
}

impl MessageOptions {
    /// Options for a roll result.
    pub fn roll() -> Self {
        Self { roll: true }
    }
}

/// Where messages go. Delivery is fire-and-forget.
pub trait Delivery: Send + Sync {
    /// Send `message` to one recipient.
    fn deliver(&self, recipient: EntityId, message: &str, options: MessageOptions);
}

/// One message as received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivered {
    /// Who received it.
    pub recipient: EntityId,
    /// The message text.
    pub message: String,
    /// The options it was sent with.
    pub options: MessageOptions,
    /// When it was delivered.
    pub sent_at: DateTime<Utc>,
}

/// In-memory [`Delivery`] that records everything sent through it.
#[derive(Debug, Default)]
pub struct Outbox {
    log: Mutex<Vec<Delivered>>,
}

impl Outbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn messages(&self) -> Vec<Delivered> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages delivered to one recipient.
    pub fn messages_for(&self, recipient: EntityId) -> Vec<Delivered> {
        self.messages()
            .into_iter()
            .filter(|d| d.recipient == recipient)
            .collect()
    }

    /// Remove and return everything delivered so far.
    pub fn drain(&self) -> Vec<Delivered> {
        std::mem::take(&mut *self.log.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Number of deliveries.
    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Delivery for Outbox {
    fn deliver(&self, recipient: EntityId, message: &str, options: MessageOptions) {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Delivered {
                recipient,
                message: message.to_string(),
                options,
                sent_at: Utc::now(),
            });
    }
}
