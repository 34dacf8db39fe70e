//! In-memory handle database
//!
//! Models the firmware handle database: an ordered list of handles, each
//! with the capabilities installed on it. Enumeration order is registration
//! order, which makes locator results deterministic for a given sequence of
//! installs.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    CapabilityKind, CapabilityRef, CapabilitySet, DeviceRegistry, Handle, HandleBuffer,
    RegistryError, Result,
};

/// Handle database entry
#[derive(Debug)]
struct HandleEntry {
    handle: Handle,
    capabilities: Vec<CapabilityRef>,
}

impl HandleEntry {
    fn find(&self, kind: CapabilityKind) -> Option<&CapabilityRef> {
        self.capabilities.iter().find(|cap| cap.kind == kind)
    }

    /// Install `cap`, replacing any capability of the same kind
    fn put(&mut self, cap: CapabilityRef) {
        match self.capabilities.iter_mut().find(|c| c.kind == cap.kind) {
            Some(existing) => *existing = cap,
            None => self.capabilities.push(cap),
        }
    }

    fn capability_set(&self) -> CapabilitySet {
        self.capabilities
            .iter()
            .fold(CapabilitySet::empty(), |set, cap| set | cap.kind.as_set())
    }
}

/// Default implementation of [`DeviceRegistry`]
pub struct InMemoryRegistry {
    /// Installed handles in registration order
    entries: Vec<HandleEntry>,
    /// Next handle value to issue
    next_handle: u32,
    /// Handle buffers handed out and not yet dropped
    outstanding_buffers: Arc<AtomicUsize>,
}

impl InMemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            // Zero is kept free so it never looks like a valid handle
            next_handle: 1,
            outstanding_buffers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a new handle carrying `capabilities`
    ///
    /// Later entries of the same kind replace earlier ones.
    pub fn install(&mut self, capabilities: &[CapabilityRef]) -> Handle {
        let handle = Handle::from_raw(self.next_handle);
        self.next_handle += 1;

        let mut entry = HandleEntry {
            handle,
            capabilities: Vec::with_capacity(capabilities.len()),
        };
        for cap in capabilities {
            entry.put(*cap);
        }
        self.entries.push(entry);

        log::debug!("installed {} with {:?}", handle, self.capabilities_of(handle));
        handle
    }

    /// Add (or replace) one capability on an existing handle
    ///
    /// # Errors
    /// [`RegistryError::InvalidHandle`] if the handle is not installed
    pub fn install_capability(&mut self, handle: Handle, cap: CapabilityRef) -> Result<()> {
        self.entry_mut(handle)?.put(cap);
        Ok(())
    }

    /// Remove one capability from a handle
    ///
    /// A handle left with no capabilities is removed from the database.
    pub fn uninstall_capability(&mut self, handle: Handle, kind: CapabilityKind) -> Result<()> {
        let entry = self.entry_mut(handle)?;
        let before = entry.capabilities.len();
        entry.capabilities.retain(|c| c.kind != kind);
        if entry.capabilities.len() == before {
            return Err(RegistryError::Unsupported {
                handle,
                capability: kind,
            });
        }

        if entry.capabilities.is_empty() {
            self.entries.retain(|e| e.handle != handle);
        }
        Ok(())
    }

    /// Remove a handle and all of its capabilities
    ///
    /// Returns the capabilities that were installed.
    pub fn uninstall(&mut self, handle: Handle) -> Result<Vec<CapabilityRef>> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.handle == handle)
            .ok_or(RegistryError::InvalidHandle { handle })?;

        let entry = self.entries.remove(pos);
        log::debug!("uninstalled {}", handle);
        Ok(entry.capabilities)
    }

    /// Capabilities currently installed on `handle`
    pub fn capabilities_of(&self, handle: Handle) -> CapabilitySet {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(HandleEntry::capability_set)
            .unwrap_or_default()
    }

    /// Number of installed handles
    pub fn handle_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of handle buffers that have been handed out and not dropped
    pub fn outstanding_buffers(&self) -> usize {
        self.outstanding_buffers.load(Ordering::Acquire)
    }

    fn entry(&self, handle: Handle) -> Result<&HandleEntry> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .ok_or(RegistryError::InvalidHandle { handle })
    }

    fn entry_mut(&mut self, handle: Handle) -> Result<&mut HandleEntry> {
        self.entries
            .iter_mut()
            .find(|e| e.handle == handle)
            .ok_or(RegistryError::InvalidHandle { handle })
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry for InMemoryRegistry {
    fn locate_handles(&self, kind: CapabilityKind) -> Result<HandleBuffer> {
        let handles: Vec<Handle> = self
            .entries
            .iter()
            .filter(|e| e.find(kind).is_some())
            .map(|e| e.handle)
            .collect();

        if handles.is_empty() {
            return Err(RegistryError::NotFound { capability: kind });
        }

        Ok(HandleBuffer::leased(handles, self.outstanding_buffers.clone()))
    }

    fn open_capability(&self, handle: Handle, kind: CapabilityKind) -> Result<CapabilityRef> {
        self.entry(handle)?
            .find(kind)
            .copied()
            .ok_or(RegistryError::Unsupported {
                handle,
                capability: kind,
            })
    }
}
