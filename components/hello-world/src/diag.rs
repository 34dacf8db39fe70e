//! USB keyboard last-character diagnostic

use device_registry::DeviceRegistry;
use usb_kb::{peek_last_key_from_usb_keyboard, DeviceArena, KbError};

use crate::console::Console;

/// Report the last buffered character of the first USB keyboard
///
/// Renders `USB KB Last Char=<c>` followed by a newline. When no USB
/// keyboard is attached nothing is rendered.
///
/// # Panics
/// If the located keyboard capability does not resolve to a valid record
/// in `arena`. That means the registry and the driver disagree about which
/// records exist, which no caller can recover from.
pub fn peek_last_char_from_usb_kb_dev<R, C>(registry: &R, arena: &DeviceArena, console: &mut C)
where
    R: DeviceRegistry + ?Sized,
    C: Console + ?Sized,
{
    match peek_last_key_from_usb_keyboard(registry, arena) {
        Ok(key) => {
            console.output_string("USB KB Last Char=");
            console.output_char(key.display_char());
            console.output_string("\n");
        }
        Err(KbError::NotFound) => {
            log::debug!("no usb keyboard attached, nothing to report");
        }
        Err(KbError::Registry(err)) => {
            log::debug!("usb keyboard lookup failed: {}", err);
        }
        Err(err @ KbError::IntegrityViolation { .. }) => {
            panic!("usb keyboard diagnostic: {}", err);
        }
    }
}
