//! Boot-time configuration
//!
//! Values are read from a TOML file. Every key has a default, so an empty
//! file (or no file at all) yields the stock greeting and no devices.
//!
//! ```toml
//! [hello_world]
//! print_enable = true
//! print_times = 3
//! print_string = "Hi\n"
//!
//! [[devices]]
//! name = "usb-kbd0"
//! typed = "abc"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::platform::MAX_USB_KEYBOARDS;

/// Error types for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {reason}")]
    Invalid { reason: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Greeting settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrintConfig {
    /// Emit the greeting at all
    pub print_enable: bool,
    /// Number of times the greeting is emitted
    pub print_times: u32,
    /// Greeting text, emitted verbatim
    pub print_string: String,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            print_enable: true,
            print_times: 1,
            print_string: String::from("UEFI Hello World!\n"),
        }
    }
}

/// A synthetic device for the simulated platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub name: String,
    /// Exposes console text input
    #[serde(default = "default_true")]
    pub text_input: bool,
    /// Attached through USB
    #[serde(default = "default_true")]
    pub usb_io: bool,
    /// Publishes a device path
    #[serde(default)]
    pub device_path: bool,
    /// Keystrokes already buffered when the diagnostic runs
    #[serde(default)]
    pub typed: String,
}

fn default_true() -> bool {
    true
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub hello_world: PrintConfig,
    pub devices: Vec<DeviceConfig>,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        log::debug!("loaded config from {}", path.display());
        Self::parse(&text)
    }

    fn validate(&self) -> Result<()> {
        for (i, device) in self.devices.iter().enumerate() {
            if device.name.is_empty() {
                return Err(ConfigError::Invalid {
                    reason: format!("device #{} has an empty name", i),
                });
            }
            if !device.text_input && !device.usb_io {
                return Err(ConfigError::Invalid {
                    reason: format!("device '{}' exposes no capabilities", device.name),
                });
            }
            if !device.typed.is_empty() && !(device.text_input && device.usb_io) {
                return Err(ConfigError::Invalid {
                    reason: format!("device '{}' is not a usb keyboard but has typed keys", device.name),
                });
            }
        }

        let keyboards = self
            .devices
            .iter()
            .filter(|d| d.text_input && d.usb_io)
            .count();
        if keyboards > MAX_USB_KEYBOARDS {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "{} usb keyboards configured, at most {} fit on the simulated buses",
                    keyboards, MAX_USB_KEYBOARDS
                ),
            });
        }

        let mut names: Vec<&str> = self.devices.iter().map(|d| d.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(ConfigError::Invalid {
                reason: format!("duplicate device name '{}'", pair[0]),
            });
        }

        Ok(())
    }
}
