//! USB transport metadata kept in the keyboard record

use core::fmt;

/// Descriptor type code for interface descriptors
pub const USB_DESC_TYPE_INTERFACE: u8 = 0x04;
/// Descriptor type code for endpoint descriptors
pub const USB_DESC_TYPE_ENDPOINT: u8 = 0x05;

/// HID interface class
pub const CLASS_HID: u8 = 0x03;
/// Boot interface subclass
pub const SUBCLASS_BOOT: u8 = 0x01;
/// Keyboard boot protocol
pub const PROTOCOL_KEYBOARD: u8 = 0x01;

/// Standard USB interface descriptor
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsbInterfaceDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub interface_number: u8,
    pub alternate_setting: u8,
    pub num_endpoints: u8,
    pub interface_class: u8,
    pub interface_sub_class: u8,
    pub interface_protocol: u8,
    pub interface: u8,
}

impl UsbInterfaceDescriptor {
    /// Descriptor of a boot-protocol keyboard interface with one endpoint
    pub const fn boot_keyboard(interface_number: u8) -> Self {
        Self {
            length: 9,
            descriptor_type: USB_DESC_TYPE_INTERFACE,
            interface_number,
            alternate_setting: 0,
            num_endpoints: 1,
            interface_class: CLASS_HID,
            interface_sub_class: SUBCLASS_BOOT,
            interface_protocol: PROTOCOL_KEYBOARD,
            interface: 0,
        }
    }

    /// Check for the HID boot keyboard class triple
    pub fn is_boot_keyboard(&self) -> bool {
        self.interface_class == CLASS_HID
            && self.interface_sub_class == SUBCLASS_BOOT
            && self.interface_protocol == PROTOCOL_KEYBOARD
    }
}

/// Standard USB endpoint descriptor
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UsbEndpointDescriptor {
    pub length: u8,
    pub descriptor_type: u8,
    pub endpoint_address: u8,
    pub attributes: u8,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl UsbEndpointDescriptor {
    /// Interrupt IN endpoint carrying 8-byte boot reports
    pub const fn interrupt_in(endpoint_number: u8, interval: u8) -> Self {
        Self {
            length: 7,
            descriptor_type: USB_DESC_TYPE_ENDPOINT,
            endpoint_address: 0x80 | (endpoint_number & 0x0F),
            attributes: 0x03,
            max_packet_size: 8,
            interval,
        }
    }
}

/// Location of the device on the USB fabric
///
/// Stands in for the transport capability reference: the record keeps
/// where it is attached, the transfers themselves belong to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UsbIo {
    pub bus: u8,
    pub port: u8,
    pub address: u8,
}

/// Device path identity of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DevicePath {
    pub pci_device: u8,
    pub pci_function: u8,
    pub usb_port: u8,
    pub usb_interface: u8,
}

impl fmt::Display for DevicePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PciRoot(0x0)/Pci({:#x},{:#x})/USB({:#x},{:#x})",
            self.pci_device, self.pci_function, self.usb_port, self.usb_interface
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::ToString;

    #[test]
    fn test_boot_keyboard_descriptor() {
        let desc = UsbInterfaceDescriptor::boot_keyboard(0);
        assert!(desc.is_boot_keyboard());
        assert_eq!(desc.num_endpoints, 1);
        assert!(!UsbInterfaceDescriptor::default().is_boot_keyboard());
    }

    #[test]
    fn test_interrupt_in_endpoint() {
        let ep = UsbEndpointDescriptor::interrupt_in(1, 10);
        assert_eq!(ep.endpoint_address, 0x81);
        assert_eq!(ep.attributes & 0x03, 0x03);
    }

    #[test]
    fn test_device_path_display() {
        let path = DevicePath {
            pci_device: 0x1d,
            pci_function: 0x0,
            usb_port: 0x1,
            usb_interface: 0x0,
        };
        assert_eq!(path.to_string(), "PciRoot(0x0)/Pci(0x1d,0x0)/USB(0x1,0x0)");
    }
}
