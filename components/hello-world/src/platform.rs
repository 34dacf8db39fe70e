//! Simulated platform
//!
//! Stands in for the firmware underneath the diagnostic: a handle database
//! populated from configuration, the USB keyboard driver's record arena,
//! and a second arena for text inputs and USB devices that are not
//! keyboards. Keyboards get their typed keys pushed through the queue
//! producer exactly as the interrupt handler would.

use device_registry::{Arena, CapabilityKind, CapabilityRef, Handle, InMemoryRegistry};
use usb_kb::{
    install_keyboard, uninstall_keyboard, DeviceArena, DevicePath, KbError, KeyData, ShiftState,
    ToggleState, UsbIo, UsbKbDevice, UsbKey,
};

use crate::config::DeviceConfig;

/// Device addresses available on one simulated USB bus
const USB_PORTS_PER_BUS: usize = 127;

/// Keyboards a platform can place before running out of bus numbers
pub const MAX_USB_KEYBOARDS: usize = (u8::MAX as usize + 1) * USB_PORTS_PER_BUS;

/// Record kept for devices the keyboard driver does not own
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtherDevice {
    pub name: String,
}

/// Handle database plus the driver-side records behind it
pub struct Platform {
    registry: InMemoryRegistry,
    keyboards: DeviceArena,
    others: Arena<OtherDevice>,
    /// Attached devices by name, in attach order
    attached: Vec<(String, Handle)>,
    /// Bus position handed to the next keyboard
    next_usb_slot: usize,
}

impl Platform {
    /// Platform with nothing attached
    pub fn new() -> Self {
        Self {
            registry: InMemoryRegistry::new(),
            keyboards: DeviceArena::new(),
            others: Arena::new(),
            attached: Vec::new(),
            next_usb_slot: 0,
        }
    }

    /// Attach every configured device in order
    ///
    /// Keyboards beyond [`MAX_USB_KEYBOARDS`] are skipped with a warning.
    pub fn from_devices(devices: &[DeviceConfig]) -> Self {
        let mut platform = Self::new();
        for device in devices {
            if platform.attach(device).is_none() {
                log::warn!("no free usb address for '{}', not attached", device.name);
            }
        }
        platform
    }

    /// Attach one device and return its handle
    ///
    /// Returns `None` if the device is a keyboard and every simulated bus
    /// address is taken.
    pub fn attach(&mut self, device: &DeviceConfig) -> Option<Handle> {
        let handle = if device.text_input && device.usb_io {
            self.attach_keyboard(device)?
        } else {
            self.attach_other(device)
        };

        log::info!("attached '{}' as {}", device.name, handle);
        self.attached.push((device.name.clone(), handle));
        Some(handle)
    }

    fn attach_keyboard(&mut self, device: &DeviceConfig) -> Option<Handle> {
        let (bus, port) = usb_location(self.next_usb_slot)?;
        self.next_usb_slot += 1;

        let usb_io = UsbIo {
            bus,
            port,
            address: port,
        };
        let device_path = device.device_path.then_some(DevicePath {
            pci_device: 0x1d,
            pci_function: 0,
            usb_port: port,
            usb_interface: 0,
        });

        let record = UsbKbDevice::new(usb_io, device_path);
        type_keys(&record, &device.typed);
        Some(install_keyboard(&mut self.registry, &mut self.keyboards, record))
    }

    fn attach_other(&mut self, device: &DeviceConfig) -> Handle {
        let owner = self.others.insert(OtherDevice {
            name: device.name.clone(),
        });

        let mut capabilities = Vec::new();
        if device.text_input {
            capabilities.push(CapabilityRef::new(CapabilityKind::SimpleTextInput, owner));
        }
        if device.usb_io {
            capabilities.push(CapabilityRef::new(CapabilityKind::UsbIo, owner));
        }
        self.registry.install(&capabilities)
    }

    /// Detach a device by name
    ///
    /// The device stays attached if uninstalling it fails.
    ///
    /// # Errors
    /// - [`KbError::NotFound`] if no device of that name is attached, or its
    ///   keyboard record is missing
    /// - [`KbError::Registry`] if its handle is no longer installed
    pub fn detach(&mut self, name: &str) -> Result<Handle, KbError> {
        let pos = self
            .attached
            .iter()
            .position(|(n, _)| n == name)
            .ok_or(KbError::NotFound)?;
        let handle = self.attached[pos].1;

        let is_keyboard = self
            .registry
            .capabilities_of(handle)
            .contains(CapabilityKind::SimpleTextInput.as_set() | CapabilityKind::UsbIo.as_set());
        if is_keyboard {
            uninstall_keyboard(&mut self.registry, &mut self.keyboards, handle)?;
        } else {
            for cap in self.registry.uninstall(handle)? {
                self.others.remove(cap.owner);
            }
        }
        self.attached.remove(pos);

        log::info!("detached '{}' ({})", name, handle);
        Ok(handle)
    }

    /// Handle of an attached device
    pub fn handle_of(&self, name: &str) -> Option<Handle> {
        self.attached
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, handle)| *handle)
    }

    /// Keyboard record of an attached device, if it is a keyboard
    pub fn keyboard(&self, name: &str) -> Option<&UsbKbDevice> {
        let handle = self.handle_of(name)?;
        self.keyboards
            .iter()
            .map(|(_, record)| record)
            .find(|record| record.controller_handle() == Some(handle))
    }

    pub fn registry(&self) -> &InMemoryRegistry {
        &self.registry
    }

    pub fn keyboards(&self) -> &DeviceArena {
        &self.keyboards
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus and port of the `slot`-th keyboard
fn usb_location(slot: usize) -> Option<(u8, u8)> {
    let bus = u8::try_from(slot / USB_PORTS_PER_BUS).ok()?;
    let port = u8::try_from(slot % USB_PORTS_PER_BUS + 1).ok()?;
    Some((bus, port))
}

/// Feed `text` into a keyboard as if it had been typed
///
/// Raw press/release reports go into the transport queue, translated
/// keystrokes into the key queue.
pub fn type_keys(record: &UsbKbDevice, text: &str) {
    if text.is_empty() {
        return;
    }

    let (Some(mut raw), Some(mut keys)) = (
        record.usb_key_queue.producer(),
        record.efi_key_queue.producer(),
    ) else {
        log::warn!("keyboard queues busy, dropping typed keys");
        return;
    };

    for c in text.chars() {
        if let Some(key_code) = usage_for_char(c) {
            raw.push(UsbKey {
                key_code,
                down: true,
            });
            raw.push(UsbKey {
                key_code,
                down: false,
            });
        }

        let key = if c.is_ascii_uppercase() {
            KeyData::from_char(c).with_state(ShiftState::LEFT_SHIFT, ToggleState::empty())
        } else {
            KeyData::from_char(c)
        };
        keys.push(key);
    }
}

/// HID keyboard usage code for a character, for the keys a boot keyboard
/// reports without modifiers
fn usage_for_char(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        c @ 'a'..='z' => Some(0x04 + (c as u8 - b'a')),
        c @ '1'..='9' => Some(0x1E + (c as u8 - b'1')),
        '0' => Some(0x27),
        '\n' | '\r' => Some(0x28),
        '\t' => Some(0x2B),
        ' ' => Some(0x2C),
        _ => None,
    }
}
