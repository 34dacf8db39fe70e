//! Last-keystroke peek

use device_registry::DeviceRegistry;

use crate::device::{DeviceArena, UsbKbDevice};
use crate::key::KeyData;
use crate::locator::find_usb_keyboard_device;
use crate::recovery::recover_device_record;
use crate::{KbError, Result};

/// Copy of the most recently translated keystroke of `record`
///
/// See [`KeyQueue::peek_last`](crate::KeyQueue::peek_last) for the slot
/// selection rule. The record and its queue are left untouched.
pub fn peek_last_key(record: &UsbKbDevice) -> KeyData {
    let (slot, key) = record.efi_key_queue.peek_last_slot();
    log::trace!("peeked key queue slot={} char={:#06x}", slot, key.unicode_char());
    key
}

/// Locate the first USB keyboard, recover its record and peek its last key
///
/// # Errors
/// - [`KbError::NotFound`] if no USB keyboard is attached
/// - [`KbError::IntegrityViolation`] if the located capability does not
///   resolve to a keyboard record in `arena`
pub fn peek_last_key_from_usb_keyboard<R>(registry: &R, arena: &DeviceArena) -> Result<KeyData>
where
    R: DeviceRegistry + ?Sized,
{
    let text_input = find_usb_keyboard_device(registry).ok_or(KbError::NotFound)?;
    let record = recover_device_record(arena, &text_input)?;
    Ok(peek_last_key(record))
}
