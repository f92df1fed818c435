// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON report written to stdout for every channel call.

use chrono::{DateTime, Utc};
use serde::Serialize;
use simreader_plugin::MethodResponse;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub captured_at: DateTime<Utc>,
    pub platform: String,
    pub channel: String,
    pub response: MethodResponse,
}

impl Report {
    pub fn new(platform: &str, channel: &str, response: MethodResponse) -> Self {
        Self {
            captured_at: Utc::now(),
            platform: platform.to_string(),
            channel: channel.to_string(),
            response,
        }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
