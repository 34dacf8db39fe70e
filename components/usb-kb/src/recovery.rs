//! Record recovery
//!
//! Goes from a text input capability back to the keyboard record that owns
//! it. The capability carries the owner's arena index, so recovery is a
//! checked lookup rather than address arithmetic.

use device_registry::{CapabilityKind, CapabilityRef};

use crate::device::{DeviceArena, UsbKbDevice, USB_KB_DEV_SIGNATURE};
use crate::{KbError, Result};

/// Resolve the keyboard record owning `text_input`
///
/// # Errors
/// [`KbError::IntegrityViolation`] if the capability is not a text input,
/// its owner is no longer in the arena, or the record signature is wrong.
pub fn recover_device_record<'a>(
    arena: &'a DeviceArena,
    text_input: &CapabilityRef,
) -> Result<&'a UsbKbDevice> {
    if text_input.kind != CapabilityKind::SimpleTextInput {
        return Err(KbError::IntegrityViolation {
            reason: "capability is not a text input",
        });
    }

    let record = arena
        .get(text_input.owner)
        .ok_or(KbError::IntegrityViolation {
            reason: "owner record is not in the arena",
        })?;

    if record.signature != USB_KB_DEV_SIGNATURE {
        log::error!(
            "record {:?} has signature {:#010x}, expected {:#010x}",
            text_input.owner,
            record.signature,
            USB_KB_DEV_SIGNATURE
        );
        return Err(KbError::IntegrityViolation {
            reason: "record signature mismatch",
        });
    }

    Ok(record)
}
