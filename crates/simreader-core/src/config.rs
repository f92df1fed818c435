// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reader configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimReaderError};

/// Method channel name the host runtime registers the plugin under.
pub const DEFAULT_CHANNEL: &str = "sim_reader";

/// Settings for the reader front end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Method channel name reported alongside every response.
    pub channel_name: String,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Pretty-print JSON output.
    pub pretty_output: bool,
    /// Serve telephony data from a snapshot file instead of the device.
    pub snapshot_path: Option<PathBuf>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_CHANNEL.into(),
            log_filter: "info".into(),
            pretty_output: false,
            snapshot_path: None,
        }
    }
}

impl ReaderConfig {
    /// Load a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_name.trim().is_empty() {
            return Err(SimReaderError::Config("channel_name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReaderConfig::load(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, ReaderConfig::default());
        assert_eq!(config.channel_name, "sim_reader");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "pretty_output": true }"#).unwrap();
        let config = ReaderConfig::load(&path).unwrap();
        assert!(config.pretty_output);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            ReaderConfig::load(&path),
            Err(SimReaderError::Serialization(_))
        ));
    }

    #[test]
    fn blank_channel_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "channel_name": "  " }"#).unwrap();
        assert!(matches!(ReaderConfig::load(&path), Err(SimReaderError::Config(_))));
    }
}
