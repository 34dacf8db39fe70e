//! USB keyboard device record

use device_registry::{Arena, Handle};

use crate::descriptor::{DevicePath, UsbEndpointDescriptor, UsbInterfaceDescriptor, UsbIo};
use crate::key::{KeyData, UsbKey};
use crate::queue::{KeyQueue, MAX_KEY_ALLOWED};

/// Pack four ASCII bytes into a record signature (first byte lowest)
pub const fn signature_32(a: u8, b: u8, c: u8, d: u8) -> u32 {
    (a as u32) | ((b as u32) << 8) | ((c as u32) << 16) | ((d as u32) << 24)
}

/// Signature carried by every live keyboard record
pub const USB_KB_DEV_SIGNATURE: u32 = signature_32(b'u', b'k', b'b', b'd');

/// Arena holding the keyboard records of one driver instance
pub type DeviceArena = Arena<UsbKbDevice>;

/// State of one attached USB keyboard
///
/// Created and updated by the transport driver. Everything else reads it
/// through a shared reference for the duration of a single inspection.
#[derive(Debug)]
pub struct UsbKbDevice {
    /// Type tag checked on recovery
    pub(crate) signature: u32,
    /// Handle the capabilities are installed on (set at install)
    pub(crate) controller_handle: Option<Handle>,
    pub device_path: Option<DevicePath>,
    pub usb_io: UsbIo,
    pub interface_descriptor: UsbInterfaceDescriptor,
    pub int_endpoint_descriptor: UsbEndpointDescriptor,
    /// Raw reports from the interrupt endpoint
    pub usb_key_queue: KeyQueue<UsbKey>,
    /// Translated keystrokes
    pub efi_key_queue: KeyQueue<KeyData>,
}

impl UsbKbDevice {
    /// Create a boot-protocol keyboard record with empty queues
    pub fn new(usb_io: UsbIo, device_path: Option<DevicePath>) -> Self {
        Self {
            signature: USB_KB_DEV_SIGNATURE,
            controller_handle: None,
            device_path,
            usb_io,
            interface_descriptor: UsbInterfaceDescriptor::boot_keyboard(0),
            int_endpoint_descriptor: UsbEndpointDescriptor::interrupt_in(1, 10),
            usb_key_queue: KeyQueue::new(MAX_KEY_ALLOWED),
            efi_key_queue: KeyQueue::new(MAX_KEY_ALLOWED),
        }
    }

    /// Record type tag
    pub fn signature(&self) -> u32 {
        self.signature
    }

    /// Handle this record is published under, once installed
    pub fn controller_handle(&self) -> Option<Handle> {
        self.controller_handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_packing() {
        assert_eq!(USB_KB_DEV_SIGNATURE, 0x6462_6b75);
        assert_eq!(USB_KB_DEV_SIGNATURE.to_le_bytes(), *b"ukbd");
    }

    #[test]
    fn test_new_record() {
        let dev = UsbKbDevice::new(UsbIo::default(), None);
        assert_eq!(dev.signature(), USB_KB_DEV_SIGNATURE);
        assert!(dev.controller_handle().is_none());
        assert!(dev.interface_descriptor.is_boot_keyboard());
        assert_eq!(dev.efi_key_queue.capacity(), MAX_KEY_ALLOWED);
        assert_eq!(dev.usb_key_queue.item_size(), 2);
    }
}
