//! Strategy window configuration, validated once at construction.

use thiserror::Error;

/// Fixed hour-of-day whose candle determines next-day directional bias.
pub const SIGNAL_HOUR: u32 = 23;

/// Default hour for entering a trade on the day after the signal.
pub const DEFAULT_ENTRY_HOUR: u32 = 11;

/// Default hour at which the recorded window ends.
pub const DEFAULT_EXIT_HOUR: u32 = 21;

/// Entry/exit hour bounds for trade windows.
///
/// Domain constraints (both hours in 0-23, exit >= entry) are checked here,
/// once, before any processing begins — never per window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    entry_hour: u32,
    exit_hour: u32,
}

/// Configuration domain violations. These abort a run before any processing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be between 0 and 23, got {value}")]
    HourOutOfRange { name: &'static str, value: u32 },

    #[error("exit hour ({exit_hour}) must be >= entry hour ({entry_hour})")]
    ExitBeforeEntry { entry_hour: u32, exit_hour: u32 },
}

impl WindowConfig {
    pub fn new(entry_hour: u32, exit_hour: u32) -> Result<Self, ConfigError> {
        if entry_hour > 23 {
            return Err(ConfigError::HourOutOfRange {
                name: "entry hour",
                value: entry_hour,
            });
        }
        if exit_hour > 23 {
            return Err(ConfigError::HourOutOfRange {
                name: "exit hour",
                value: exit_hour,
            });
        }
        if exit_hour < entry_hour {
            return Err(ConfigError::ExitBeforeEntry {
                entry_hour,
                exit_hour,
            });
        }
        Ok(Self {
            entry_hour,
            exit_hour,
        })
    }

    pub fn entry_hour(&self) -> u32 {
        self.entry_hour
    }

    pub fn exit_hour(&self) -> u32 {
        self.exit_hour
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            entry_hour: DEFAULT_ENTRY_HOUR,
            exit_hour: DEFAULT_EXIT_HOUR,
        }
    }
}
