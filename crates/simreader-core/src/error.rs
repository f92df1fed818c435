// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the SIM reader.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for all SIM reader operations.
#[derive(Debug, Error)]
pub enum SimReaderError {
    // -- Gate --
    #[error("READ_PHONE_STATE permission required")]
    PermissionDenied,

    // -- Telephony reads --
    #[error("telephony service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("telephony read failed: {0}")]
    Telephony(String),

    #[error("unexpected platform fault: {0}")]
    Fault(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Files / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SimReaderError>;

/// Error kind tag carried by a failed method-call response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    PermissionDenied,
    SimError,
    NetworkError,
}

impl ErrorCode {
    /// Wire name of the code, e.g. `"SIM_ERROR"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "PERMISSION_DENIED",
            Self::SimError => "SIM_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_serialize_as_wire_names() {
        let json = serde_json::to_string(&ErrorCode::PermissionDenied).unwrap();
        assert_eq!(json, "\"PERMISSION_DENIED\"");
        let json = serde_json::to_string(&ErrorCode::NetworkError).unwrap();
        assert_eq!(json, "\"NETWORK_ERROR\"");
    }

    #[test]
    fn display_matches_serde_name() {
        for code in [ErrorCode::PermissionDenied, ErrorCode::SimError, ErrorCode::NetworkError] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json.trim_matches('"'), code.to_string());
        }
    }

    #[test]
    fn permission_message_names_the_grant() {
        assert_eq!(
            SimReaderError::PermissionDenied.to_string(),
            "READ_PHONE_STATE permission required"
        );
    }
}
