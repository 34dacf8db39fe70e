//! Device Registry - Capability discovery for attached devices
//!
//! # Purpose
//! The device registry is the platform service that answers two questions:
//! which handles expose a given capability, and what capability instance a
//! handle provides for a given kind. Device records themselves live in an
//! [`Arena`]; capability references carry the arena index of their owner, so
//! a consumer can go from "the text input of handle 3" to "the full keyboard
//! record" without any pointer arithmetic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │   Diagnostic code (device locator)      │
//! └──────────────┬──────────────────────────┘
//!                │ locate_handles / open_capability
//! ┌──────────────▼──────────────────────────┐
//! │   DeviceRegistry (this crate)           │
//! │  • Handle database                      │
//! │  • Scoped handle buffers                │
//! │  • Record arena                         │
//! └──────────────┬──────────────────────────┘
//!                │ install / uninstall
//! ┌──────────────▼──────────────────────────┐
//! │   Transport drivers (USB, ...)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Testing Strategy
//! - Unit tests: arena generations, handle buffer release, locate ordering
//! - Integration tests: driver-style install/uninstall workflows

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

mod arena;
mod handle_buffer;
mod in_memory;

pub use arena::{Arena, ArenaIndex};
pub use handle_buffer::HandleBuffer;
pub use in_memory::InMemoryRegistry;

use core::fmt;

use bitflags::bitflags;
use thiserror::Error;

/// Error types for registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No handles provide {capability}")]
    NotFound { capability: CapabilityKind },

    #[error("{handle} does not support {capability}")]
    Unsupported {
        handle: Handle,
        capability: CapabilityKind,
    },

    #[error("{handle} is not installed")]
    InvalidHandle { handle: Handle },
}

pub type Result<T> = core::result::Result<T, RegistryError>;

/// Opaque identity of a registered device
///
/// Handles are never reused by a registry instance, so a handle that
/// survived an uninstall is reported as invalid rather than aliasing a new
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle(u32);

impl Handle {
    /// Wrap a raw handle value
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw handle value
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({:#x})", self.0)
    }
}

/// Capability kinds a handle can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    /// Console text input (keystroke source)
    SimpleTextInput,

    /// USB transport
    UsbIo,

    /// Device path identity
    DevicePath,
}

impl CapabilityKind {
    /// Protocol GUID the capability is published under by firmware
    pub const fn guid(self) -> &'static str {
        match self {
            CapabilityKind::SimpleTextInput => "387477c1-69c7-11d2-8e39-00a0c969723b",
            CapabilityKind::UsbIo => "2b2f68d6-0cd2-44cf-8e8b-bba20b1b5b75",
            CapabilityKind::DevicePath => "09576e91-6d3f-11d2-8e39-00a0c969723b",
        }
    }

    /// Single-bit set for this kind
    pub const fn as_set(self) -> CapabilitySet {
        match self {
            CapabilityKind::SimpleTextInput => CapabilitySet::SIMPLE_TEXT_INPUT,
            CapabilityKind::UsbIo => CapabilitySet::USB_IO,
            CapabilityKind::DevicePath => CapabilitySet::DEVICE_PATH,
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapabilityKind::SimpleTextInput => "SimpleTextInput",
            CapabilityKind::UsbIo => "UsbIo",
            CapabilityKind::DevicePath => "DevicePath",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of capability kinds installed on a handle
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CapabilitySet: u8 {
        const SIMPLE_TEXT_INPUT = 1 << 0;
        const USB_IO = 1 << 1;
        const DEVICE_PATH = 1 << 2;
    }
}

/// A capability instance handed out by the registry
///
/// The instance does not contain the capability's state; it names the
/// record that owns it. Consumers resolve `owner` against the arena the
/// producing driver keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapabilityRef {
    /// Which capability this is
    pub kind: CapabilityKind,

    /// Arena index of the enclosing device record
    pub owner: ArenaIndex,
}

impl CapabilityRef {
    pub const fn new(kind: CapabilityKind, owner: ArenaIndex) -> Self {
        Self { kind, owner }
    }
}

/// Registry service interface
///
/// Injected into consumers instead of being reached through ambient global
/// state, so tests can fabricate a registry of synthetic devices.
pub trait DeviceRegistry {
    /// Return every handle that currently provides `kind`
    ///
    /// The buffer is released when dropped.
    ///
    /// # Errors
    /// [`RegistryError::NotFound`] if no handle provides `kind`
    fn locate_handles(&self, kind: CapabilityKind) -> Result<HandleBuffer>;

    /// Resolve the capability instance `kind` on `handle`
    ///
    /// # Errors
    /// - [`RegistryError::InvalidHandle`] if the handle is not installed
    /// - [`RegistryError::Unsupported`] if the handle lacks `kind`
    fn open_capability(&self, handle: Handle, kind: CapabilityKind) -> Result<CapabilityRef>;
}

impl<R: DeviceRegistry + ?Sized> DeviceRegistry for &R {
    fn locate_handles(&self, kind: CapabilityKind) -> Result<HandleBuffer> {
        (**self).locate_handles(kind)
    }

    fn open_capability(&self, handle: Handle, kind: CapabilityKind) -> Result<CapabilityRef> {
        (**self).open_capability(handle, kind)
    }
}
