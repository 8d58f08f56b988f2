use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum bytes kept of each captured frame.
pub const DEFAULT_RECV_BUFFER_LEN: usize = 2048;
/// Anything shorter cannot hold the Ethernet, IPv4 and TCP headers together.
pub const MIN_RECV_BUFFER_LEN: usize = 64;
/// Frames that can wait between the capture thread and the decoder.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Settings of the `listen` command, loaded from a TOML file and overridden by CLI flags.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SnifferConfig {
    /// Interface to capture on; the first suitable one is used if missing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    pub recv_buffer_len: usize,
    pub channel_capacity: usize,
    /// Stop after this many frames.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_frames: Option<u64>,
    pub show_payload: bool,
}

impl Default for SnifferConfig {
    fn default() -> Self {
        Self {
            interface: None,
            recv_buffer_len: DEFAULT_RECV_BUFFER_LEN,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_frames: None,
            show_payload: true,
        }
    }
}

impl SnifferConfig {
    pub fn from_toml_str(toml_str: &str, path: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        config.validate(path)?;
        Ok(config)
    }

    /// Checks the bounds the command line flags enforce on the same settings.
    pub fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let invalid = |field, reason: String| ConfigError::Invalid {
            path: path.to_string(),
            field,
            reason,
        };

        if self.recv_buffer_len < MIN_RECV_BUFFER_LEN {
            return Err(invalid(
                "recv_buffer_len",
                format!(
                    "must be at least {MIN_RECV_BUFFER_LEN}, got {}",
                    self.recv_buffer_len
                ),
            ));
        }
        if self.channel_capacity == 0 {
            return Err(invalid(
                "channel_capacity",
                "must be at least 1, got 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let display_path = path.display().to_string();
        let toml_str = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display_path.clone(),
            source,
        })?;
        Self::from_toml_str(&toml_str, &display_path)
    }
}
