//! Integration tests for keyboard discovery and last-key inspection
//!
//! These tests fabricate registries of synthetic devices the way a
//! transport driver would populate them, then run the locate → recover →
//! peek chain against them.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use device_registry::{Arena, CapabilityKind, CapabilityRef, DeviceRegistry, InMemoryRegistry};
use usb_kb::*;

/// Install a text input that is not on USB (e.g. a serial console)
fn install_serial_console(registry: &mut InMemoryRegistry, consoles: &mut Arena<&'static str>) {
    let owner = consoles.insert("serial");
    registry.install(&[CapabilityRef::new(CapabilityKind::SimpleTextInput, owner)]);
}

fn keyboard_typing(text: &str) -> UsbKbDevice {
    let device = UsbKbDevice::new(UsbIo::default(), None);
    {
        let mut producer = device.efi_key_queue.producer().unwrap();
        for c in text.chars() {
            producer.push(KeyData::from_char(c));
        }
    }
    device
}

#[test]
fn test_no_qualifying_handles() {
    let mut registry = InMemoryRegistry::new();
    let arena = DeviceArena::new();
    let mut consoles = Arena::new();
    install_serial_console(&mut registry, &mut consoles);
    install_serial_console(&mut registry, &mut consoles);

    assert_eq!(find_usb_keyboard_device(&registry), None);
    assert_eq!(
        peek_last_key_from_usb_keyboard(&registry, &arena),
        Err(KbError::NotFound)
    );
    assert_eq!(registry.outstanding_buffers(), 0);
}

#[test]
fn test_single_keyboard_selected_at_any_position() {
    for position in 0..4 {
        let mut registry = InMemoryRegistry::new();
        let mut arena = DeviceArena::new();
        let mut consoles = Arena::new();

        for i in 0..4 {
            if i == position {
                install_keyboard(&mut registry, &mut arena, keyboard_typing("q"));
            } else {
                install_serial_console(&mut registry, &mut consoles);
            }
        }

        let key = peek_last_key_from_usb_keyboard(&registry, &arena).unwrap();
        assert_eq!(key.display_char(), 'q', "keyboard at position {}", position);
        assert_eq!(registry.outstanding_buffers(), 0);
    }
}

#[test]
fn test_first_registered_keyboard_wins() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = DeviceArena::new();
    let mut consoles = Arena::new();
    install_serial_console(&mut registry, &mut consoles);
    let first = install_keyboard(&mut registry, &mut arena, keyboard_typing("1"));
    install_keyboard(&mut registry, &mut arena, keyboard_typing("2"));

    let selected = find_usb_keyboard_device(&registry).unwrap();
    let record = recover_device_record(&arena, &selected).unwrap();
    assert_eq!(record.controller_handle(), Some(first));

    // Same registry state, same selection
    for _ in 0..3 {
        assert_eq!(find_usb_keyboard_device(&registry), Some(selected));
    }
}

#[test]
fn test_detached_keyboard_falls_through_to_next() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = DeviceArena::new();
    let first = install_keyboard(&mut registry, &mut arena, keyboard_typing("a"));
    install_keyboard(&mut registry, &mut arena, keyboard_typing("b"));

    uninstall_keyboard(&mut registry, &mut arena, first).unwrap();

    let key = peek_last_key_from_usb_keyboard(&registry, &arena).unwrap();
    assert_eq!(key.display_char(), 'b');
}

#[test]
fn test_stale_capability_is_integrity_violation() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = DeviceArena::new();
    let handle = install_keyboard(&mut registry, &mut arena, keyboard_typing("s"));

    let held = registry
        .open_capability(handle, CapabilityKind::SimpleTextInput)
        .unwrap();
    uninstall_keyboard(&mut registry, &mut arena, handle).unwrap();
    install_keyboard(&mut registry, &mut arena, keyboard_typing("t"));

    let result = recover_device_record(&arena, &held);
    assert!(matches!(result, Err(KbError::IntegrityViolation { .. })));
}

#[test]
fn test_capability_from_foreign_arena_is_integrity_violation() {
    let mut registry = InMemoryRegistry::new();
    let mut driver_arena = DeviceArena::new();
    install_keyboard(&mut registry, &mut driver_arena, keyboard_typing("x"));

    let other_arena = DeviceArena::new();
    let result = peek_last_key_from_usb_keyboard(&registry, &other_arena);
    assert!(matches!(result, Err(KbError::IntegrityViolation { .. })));
}

#[test]
fn test_registry_trait_object() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = Arena::new();
    install_keyboard(&mut registry, &mut arena, keyboard_typing("dyn"));

    let dyn_registry: &dyn DeviceRegistry = &registry;
    let key = peek_last_key_from_usb_keyboard(dyn_registry, &arena).unwrap();
    assert_eq!(key.display_char(), 'n');
}

#[test]
fn test_boundary_slot_after_wrap() {
    let device = UsbKbDevice::new(UsbIo::default(), None);
    let capacity = device.efi_key_queue.capacity();
    {
        let mut producer = device.efi_key_queue.producer().unwrap();
        for i in 0..=capacity {
            let c = char::from_u32('A' as u32 + (i % 26) as u32).unwrap();
            producer.push(KeyData::from_char(c));
        }
    }

    let queue = &device.efi_key_queue;
    assert_eq!(queue.head(), 0);
    let last = peek_last_key(&device);
    assert_eq!(last, queue.slot(capacity).unwrap());
    assert_eq!(last.display_char(), (b'A' + (capacity % 26) as u8) as char);
}

#[test]
fn test_concurrent_producer_never_tears() {
    const ROUNDS: u16 = 20_000;

    let device = UsbKbDevice::new(UsbIo::default(), None);
    let done = AtomicBool::new(false);

    // Every pushed record has scan_code == !unicode_char, so a torn copy
    // would break the relation.
    let make = |i: u16| {
        let mut key = KeyData::from_char('\0');
        key.key.unicode_char = i;
        key.key.scan_code = !i;
        key
    };

    thread::scope(|s| {
        s.spawn(|| {
            let mut producer = device.efi_key_queue.producer().unwrap();
            for i in 1..=ROUNDS {
                producer.push(make(i));
            }
            done.store(true, Ordering::Release);
        });

        s.spawn(|| {
            let mut last_seen = 0u16;
            loop {
                let finished = done.load(Ordering::Acquire);
                let key = peek_last_key(&device);
                if key != KeyData::default() {
                    assert_eq!(key.key.scan_code, !key.key.unicode_char);
                    last_seen = key.key.unicode_char;
                }
                if finished {
                    break;
                }
            }
            assert_eq!(last_seen, ROUNDS);
        });
    });
}
