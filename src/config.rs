//! Configuration management for the median degree stream

use std::num::NonZeroU32;

use crate::error::ConfigError;

/// Default length of the sliding window, in seconds
pub const DEFAULT_WINDOW_SECONDS: u32 = 60;

/// Settings of a `run` invocation
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON-lines input
    pub input: String,

    /// Output path; `None` writes to stdout
    pub output: Option<String>,

    /// Length of the sliding window in seconds
    pub window_seconds: u32,

    /// Optional path of a JSON run summary
    pub summary: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: String::from("venmo_input/venmo-trans.txt"),
            output: None,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            summary: None,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        input: String,
        output: Option<String>,
        window_seconds: u32,
        summary: Option<String>,
    ) -> Self {
        Self {
            input,
            output,
            window_seconds,
            summary,
        }
    }

    /// The window as a validated non-zero duration
    pub fn window(&self) -> Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.window_seconds).ok_or(ConfigError::ZeroWindow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let config = Config::default();
        assert_eq!(config.window().unwrap().get(), 60);
        assert!(config.output.is_none());
    }

    #[test]
    fn test_zero_window_rejected() {
        let config = Config::new("in.txt".into(), None, 0, None);
        assert_eq!(config.window(), Err(ConfigError::ZeroWindow));
    }
}
