// crates/loadgate-dispatch/src/transport/channel.rs
// ============================================================================
// Module: Channel Transport
// Description: In-process alert delivery over an mpsc sender.
// Purpose: Hand alerts to another thread; used heavily by tests.
// Dependencies: loadgate-rules
// ============================================================================

//! ## Overview
//! In-process alert delivery over an mpsc sender, handing alerts to another
//! thread; used heavily by tests.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Mutex;
use std::sync::mpsc::Sender;

use loadgate_rules::AlertRecord;

use crate::transport::DeliveryReceipt;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Channel Transport
// ============================================================================

/// Transport that forwards alerts over an in-process channel.
///
/// A closed receiver makes every subsequent delivery fail; the transport
/// never blocks.
pub struct ChannelTransport {
    /// Sender half; guarded so the transport stays `Sync`.
    sender: Mutex<Sender<AlertRecord>>,
}

impl ChannelTransport {
    /// Creates a transport around the sender half of a channel.
    #[must_use]
    pub fn new(sender: Sender<AlertRecord>) -> Self {
        Self {
            sender: Mutex::new(sender),
        }
    }
}

impl Transport for ChannelTransport {
    fn deliver(&self, alert: &AlertRecord) -> Result<DeliveryReceipt, TransportError> {
        let sender = self
            .sender
            .lock()
            .map_err(|_| TransportError::Unavailable("channel sender poisoned".to_string()))?;
        sender
            .send(alert.clone())
            .map_err(|_| TransportError::DeliveryFailed("channel receiver closed".to_string()))?;
        Ok(DeliveryReceipt {
            transport: "channel".to_string(),
            endpoint: "in-process channel".to_string(),
        })
    }
}
