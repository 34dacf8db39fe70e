//! Device locator

use device_registry::{CapabilityKind, CapabilityRef, DeviceRegistry};

/// Find the first console text input that is also a USB device
///
/// Walks the text input handles in enumeration order and returns the text
/// input capability of the first handle that also carries the USB
/// transport. Handles without it are skipped. An empty or failing registry
/// query is a normal "nothing attached" outcome and yields `None`.
///
/// The handle buffer is released on every return path.
pub fn find_usb_keyboard_device<R>(registry: &R) -> Option<CapabilityRef>
where
    R: DeviceRegistry + ?Sized,
{
    let handles = match registry.locate_handles(CapabilityKind::SimpleTextInput) {
        Ok(handles) => handles,
        Err(err) => {
            log::debug!("no text input devices: {}", err);
            return None;
        }
    };

    for &handle in handles.iter() {
        if let Err(err) = registry.open_capability(handle, CapabilityKind::UsbIo) {
            log::trace!("skipping {}: {}", handle, err);
            continue;
        }

        match registry.open_capability(handle, CapabilityKind::SimpleTextInput) {
            Ok(text_input) => {
                log::debug!("selected usb keyboard {}", handle);
                return Some(text_input);
            }
            Err(err) => {
                log::trace!("skipping {}: {}", handle, err);
                continue;
            }
        }
    }

    log::debug!("{} text input handles, none on usb", handles.handle_count());
    None
}
