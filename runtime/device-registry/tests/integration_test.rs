//! Integration tests for the handle database
//!
//! Drives the registry the way transport drivers do: records go into an
//! arena, capabilities pointing at them go onto handles, and consumers
//! enumerate and resolve them.

use device_registry::*;

struct FakeDevice {
    name: &'static str,
}

fn attach(
    registry: &mut InMemoryRegistry,
    arena: &mut Arena<FakeDevice>,
    name: &'static str,
    kinds: &[CapabilityKind],
) -> Handle {
    let owner = arena.insert(FakeDevice { name });
    let caps: Vec<CapabilityRef> = kinds
        .iter()
        .map(|&kind| CapabilityRef::new(kind, owner))
        .collect();
    registry.install(&caps)
}

#[test]
fn test_resolve_owner_through_capability() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = Arena::new();
    attach(&mut registry, &mut arena, "serial", &[CapabilityKind::SimpleTextInput]);
    let kbd = attach(
        &mut registry,
        &mut arena,
        "usb-kbd",
        &[CapabilityKind::SimpleTextInput, CapabilityKind::UsbIo],
    );

    let buffer = registry
        .locate_handles(CapabilityKind::UsbIo)
        .expect("usb handle installed");
    assert_eq!(&buffer[..], &[kbd]);

    let cap = registry
        .open_capability(buffer[0], CapabilityKind::SimpleTextInput)
        .unwrap();
    assert_eq!(arena.get(cap.owner).map(|d| d.name), Some("usb-kbd"));
}

#[test]
fn test_buffers_released_on_every_path() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = Arena::new();
    attach(&mut registry, &mut arena, "a", &[CapabilityKind::SimpleTextInput]);
    attach(&mut registry, &mut arena, "b", &[CapabilityKind::SimpleTextInput]);

    fn first_with_usb(registry: &InMemoryRegistry) -> Option<Handle> {
        let handles = registry.locate_handles(CapabilityKind::SimpleTextInput).ok()?;
        for &handle in handles.iter() {
            if registry.open_capability(handle, CapabilityKind::UsbIo).is_ok() {
                return Some(handle);
            }
        }
        None
    }

    assert_eq!(first_with_usb(&registry), None);
    assert_eq!(registry.outstanding_buffers(), 0);

    let held = registry
        .locate_handles(CapabilityKind::SimpleTextInput)
        .unwrap();
    assert_eq!(registry.outstanding_buffers(), 1);
    drop(held);
    assert_eq!(registry.outstanding_buffers(), 0);
}

#[test]
fn test_uninstall_detaches_and_invalidates() {
    let mut registry = InMemoryRegistry::new();
    let mut arena = Arena::new();
    let handle = attach(
        &mut registry,
        &mut arena,
        "kbd",
        &[CapabilityKind::SimpleTextInput, CapabilityKind::DevicePath],
    );

    let caps = registry.uninstall(handle).unwrap();
    assert_eq!(caps.len(), 2);
    let owner = caps[0].owner;
    assert!(arena.remove(owner).is_some());

    assert!(matches!(
        registry.open_capability(handle, CapabilityKind::SimpleTextInput),
        Err(RegistryError::InvalidHandle { .. })
    ));
    assert!(matches!(
        registry.locate_handles(CapabilityKind::SimpleTextInput),
        Err(RegistryError::NotFound { .. })
    ));
    assert!(arena.get(owner).is_none());
    assert!(arena.is_empty());
}
