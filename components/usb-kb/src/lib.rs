//! USB Keyboard - Device records and last-keystroke inspection
//!
//! # Purpose
//! Finds the first console text input that is backed by a USB transport,
//! resolves its keyboard record, and reads the most recently enqueued
//! keystroke without disturbing the driver that fills the queue.
//!
//! # Integration Points
//! - Depends on: `device_registry` (handle database, record arena)
//! - Provides to: diagnostic applications
//! - Producer side: the transport driver owns every queue index update
//!
//! # Flow
//!
//! ```text
//! find_usb_keyboard_device ──► CapabilityRef { owner }
//!                                   │
//! recover_device_record    ──► &UsbKbDevice (signature checked)
//!                                   │
//! peek_last_key            ──► KeyData (copy of buffer[head - 1])
//! ```
//!
//! # Testing Strategy
//! - Unit tests: queue index rules, record recovery failures
//! - Integration tests: locator selection over fabricated registries,
//!   concurrent producer with a peeking reader

#![no_std]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

mod binding;
mod descriptor;
mod device;
mod key;
mod locator;
mod peek;
mod queue;
mod recovery;

pub use binding::{install_keyboard, uninstall_keyboard};
pub use descriptor::{
    DevicePath, UsbEndpointDescriptor, UsbInterfaceDescriptor, UsbIo, CLASS_HID,
    PROTOCOL_KEYBOARD, SUBCLASS_BOOT,
};
pub use device::{signature_32, DeviceArena, UsbKbDevice, USB_KB_DEV_SIGNATURE};
pub use key::{InputKey, KeyData, KeyState, ShiftState, ToggleState, UsbKey};
pub use locator::find_usb_keyboard_device;
pub use peek::{peek_last_key, peek_last_key_from_usb_keyboard};
pub use queue::{KeyQueue, Producer, MAX_KEY_ALLOWED};
pub use recovery::recover_device_record;

use device_registry::RegistryError;
use thiserror::Error;

/// Error types for keyboard inspection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KbError {
    #[error("No USB keyboard is attached")]
    NotFound,

    /// The capability does not lead back to a valid keyboard record.
    /// Unreachable with correctly typed capabilities; callers treat it as
    /// fatal.
    #[error("Keyboard record integrity violation: {reason}")]
    IntegrityViolation { reason: &'static str },

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

pub type Result<T> = core::result::Result<T, KbError>;
