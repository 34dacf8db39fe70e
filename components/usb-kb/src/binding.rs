//! Driver binding - publish and retract keyboard records
//!
//! Starting a keyboard stores its record in the driver's arena and installs
//! the text input, USB transport and (when known) device path capabilities
//! on a fresh handle, all pointing at the record's arena index.

use alloc::vec::Vec;

use device_registry::{CapabilityKind, CapabilityRef, DeviceRegistry, Handle, InMemoryRegistry};

use crate::device::{DeviceArena, UsbKbDevice};
use crate::{KbError, Result};

/// Publish a keyboard record and return the handle it is installed on
pub fn install_keyboard(
    registry: &mut InMemoryRegistry,
    arena: &mut DeviceArena,
    device: UsbKbDevice,
) -> Handle {
    let has_device_path = device.device_path.is_some();
    let owner = arena.insert(device);

    let mut capabilities = Vec::with_capacity(3);
    capabilities.push(CapabilityRef::new(CapabilityKind::SimpleTextInput, owner));
    capabilities.push(CapabilityRef::new(CapabilityKind::UsbIo, owner));
    if has_device_path {
        capabilities.push(CapabilityRef::new(CapabilityKind::DevicePath, owner));
    }

    let handle = registry.install(&capabilities);
    if let Some(record) = arena.get_mut(owner) {
        record.controller_handle = Some(handle);
    }

    log::debug!("usb keyboard started on {} (record {:?})", handle, owner);
    handle
}

/// Retract a keyboard installed by [`install_keyboard`]
///
/// The handle is removed from the registry and the record is taken out of
/// the arena, which invalidates any capability reference still held.
///
/// # Errors
/// - [`KbError::Registry`] if the handle is not installed
/// - [`KbError::NotFound`] if the handle does not carry a keyboard record
pub fn uninstall_keyboard(
    registry: &mut InMemoryRegistry,
    arena: &mut DeviceArena,
    handle: Handle,
) -> Result<UsbKbDevice> {
    let text_input = registry.open_capability(handle, CapabilityKind::SimpleTextInput)?;
    if !arena.contains(text_input.owner) {
        return Err(KbError::NotFound);
    }
    registry.uninstall(handle)?;

    let device = arena.remove(text_input.owner).ok_or(KbError::NotFound)?;
    log::debug!("usb keyboard stopped on {}", handle);
    Ok(device)
}
