//! Greeting emitter

use crate::config::PrintConfig;
use crate::console::Console;

/// Emit the configured greeting
///
/// Writes `print_string` exactly `print_times` times when `print_enable` is
/// set; does nothing otherwise.
pub fn emit_greeting<C: Console + ?Sized>(config: &PrintConfig, console: &mut C) {
    if !config.print_enable {
        log::debug!("greeting disabled");
        return;
    }

    for _ in 0..config.print_times {
        console.output_string(&config.print_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::RecordingConsole;

    fn config(enable: bool, times: u32, s: &str) -> PrintConfig {
        PrintConfig {
            print_enable: enable,
            print_times: times,
            print_string: s.to_string(),
        }
    }

    #[test]
    fn test_enabled_three_times() {
        let mut console = RecordingConsole::default();
        emit_greeting(&config(true, 3, "Hi"), &mut console);
        assert_eq!(console.strings, vec!["Hi", "Hi", "Hi"]);
    }

    #[test]
    fn test_disabled_prints_nothing() {
        for times in [0, 1, 7] {
            let mut console = RecordingConsole::default();
            emit_greeting(&config(false, times, "Hi"), &mut console);
            assert!(console.strings.is_empty());
        }
    }

    #[test]
    fn test_zero_times_prints_nothing() {
        let mut console = RecordingConsole::default();
        emit_greeting(&config(true, 0, "Hi"), &mut console);
        assert!(console.strings.is_empty());
    }
}
