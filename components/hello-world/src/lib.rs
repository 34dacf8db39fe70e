//! Hello World - Greeting plus USB keyboard diagnostic
//!
//! Prints the configured greeting the configured number of times, then
//! reports the most recently buffered character of the first attached USB
//! keyboard.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hello_world::{run, Config, Platform, StdoutConsole};
//!
//! let config = Config::parse("[hello_world]\nprint_times = 2\n")?;
//! let platform = Platform::from_devices(&config.devices);
//! let mut console = StdoutConsole::stdout();
//! run(&config, &platform, &mut console);
//! # Ok::<(), hello_world::ConfigError>(())
//! ```

pub mod config;
pub mod console;
pub mod diag;
pub mod greeting;
pub mod platform;

pub use config::{Config, ConfigError, DeviceConfig, PrintConfig};
pub use console::{Console, NullConsole, RecordingConsole, StdoutConsole, WriterConsole};
pub use diag::peek_last_char_from_usb_kb_dev;
pub use greeting::emit_greeting;
pub use platform::Platform;

/// Status the routine reports to its caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => std::process::ExitCode::SUCCESS,
        }
    }
}

/// Run the greeting and the keyboard diagnostic
///
/// A missing keyboard only means there is nothing to report; the routine
/// succeeds either way.
pub fn run<C: Console + ?Sized>(config: &Config, platform: &Platform, console: &mut C) -> ExitStatus {
    emit_greeting(&config.hello_world, console);
    peek_last_char_from_usb_kb_dev(platform.registry(), platform.keyboards(), console);
    ExitStatus::Success
}
