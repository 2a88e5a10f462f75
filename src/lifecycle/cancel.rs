//! Cancellation of a logical request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Handle identifying one logical request and carrying its cancellation flag.
///
/// Cancellation is advisory: the resolver checks the flag once when an
/// attempt's response arrives. An attempt already past that point still
/// delivers its callbacks.
#[derive(Debug, Clone)]
pub struct RequestHandle {
    id: Uuid,
    cancelled: Arc<AtomicBool>,
}

impl RequestHandle {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request ID used to correlate log events.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::AcqRel) {
            tracing::debug!(request_id = %self.id, "Request cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for RequestHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_shared_between_clones() {
        let handle = RequestHandle::new();
        let other = handle.clone();
        assert!(!other.is_cancelled());

        handle.cancel();
        handle.cancel();
        assert!(other.is_cancelled());
        assert_eq!(handle.id(), other.id());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RequestHandle::new().id(), RequestHandle::new().id());
    }
}
