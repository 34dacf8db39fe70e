//! Scoped handle buffers
//!
//! `locate_handles` hands out a snapshot of matching handles. The snapshot
//! is a leased resource: the registry counts outstanding buffers and the
//! count drops back when the buffer goes out of scope, on every exit path.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Deref;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::Handle;

/// Snapshot of the handles providing a capability
///
/// Dereferences to `[Handle]` in enumeration (registration) order.
#[derive(Debug)]
pub struct HandleBuffer {
    handles: Vec<Handle>,
    /// Outstanding-buffer counter of the issuing registry
    lease: Option<Arc<AtomicUsize>>,
}

impl HandleBuffer {
    /// Create a buffer that is not tracked by any registry
    pub fn new(handles: Vec<Handle>) -> Self {
        Self {
            handles,
            lease: None,
        }
    }

    /// Create a buffer charged against `lease`
    ///
    /// The counter is incremented now and decremented on drop.
    pub fn leased(handles: Vec<Handle>, lease: Arc<AtomicUsize>) -> Self {
        lease.fetch_add(1, Ordering::AcqRel);
        Self {
            handles,
            lease: Some(lease),
        }
    }

    /// Number of handles in the buffer
    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }
}

impl Deref for HandleBuffer {
    type Target = [Handle];

    fn deref(&self) -> &[Handle] {
        &self.handles
    }
}

impl Drop for HandleBuffer {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            lease.fetch_sub(1, Ordering::AcqRel);
        }
        log::trace!("released handle buffer ({} handles)", self.handles.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lease_released_on_drop() {
        let lease = Arc::new(AtomicUsize::new(0));
        {
            let buffer = HandleBuffer::leased(
                vec![Handle::from_raw(1), Handle::from_raw(2)],
                lease.clone(),
            );
            assert_eq!(lease.load(Ordering::Acquire), 1);
            assert_eq!(buffer.handle_count(), 2);
            assert_eq!(buffer[1], Handle::from_raw(2));
        }
        assert_eq!(lease.load(Ordering::Acquire), 0);
    }

    #[test]
    fn test_untracked_buffer() {
        let buffer = HandleBuffer::new(Vec::new());
        assert!(buffer.is_empty());
    }
}
