// crates/loadgate-dispatch/src/transport/callback.rs
// ============================================================================
// Module: Callback Transport
// Description: Alert delivery through a caller-supplied closure.
// Purpose: Let embedders and tests observe deliveries without I/O.
// Dependencies: loadgate-rules
// ============================================================================

//! ## Overview
//! Alert delivery through a caller-supplied closure, letting embedders and
//! tests observe deliveries without I/O.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use loadgate_rules::AlertRecord;

use crate::transport::DeliveryReceipt;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Callback Transport
// ============================================================================

/// Delivery handler signature for [`CallbackTransport`].
pub type DeliveryHandler =
    dyn Fn(&AlertRecord) -> Result<DeliveryReceipt, TransportError> + Send + Sync;

/// Transport that delegates delivery to a closure.
#[derive(Clone)]
pub struct CallbackTransport {
    /// Caller-supplied delivery handler.
    handler: Arc<DeliveryHandler>,
}

impl CallbackTransport {
    /// Creates a transport around a delivery handler.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&AlertRecord) -> Result<DeliveryReceipt, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for CallbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTransport").finish_non_exhaustive()
    }
}

impl Transport for CallbackTransport {
    fn deliver(&self, alert: &AlertRecord) -> Result<DeliveryReceipt, TransportError> {
        (self.handler)(alert)
    }
}
