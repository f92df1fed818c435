// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Named method-call channel.
//
// Calls arrive as `{ "method": ..., "arguments": ... }` and are answered with
// one of three response shapes. Unknown method names are not errors; they
// answer `not_implemented` so the caller can feature-detect.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use simreader_bridge::traits::TelephonyBridge;
use simreader_core::ErrorCode;
use tracing::debug;

use crate::operations::{OperationError, SimReader};

/// The methods this channel answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    GetSimInfo,
    GetAllSimInfo,
    HasSimCard,
    GetNetworkInfo,
}

impl Method {
    pub const ALL: [Method; 4] = [
        Method::GetSimInfo,
        Method::GetAllSimInfo,
        Method::HasSimCard,
        Method::GetNetworkInfo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetSimInfo => "getSimInfo",
            Self::GetAllSimInfo => "getAllSimInfo",
            Self::HasSimCard => "hasSimCard",
            Self::GetNetworkInfo => "getNetworkInfo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

/// An incoming call. Arguments are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            arguments: Value::Null,
        }
    }
}

/// Answer to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    Success {
        result: Value,
    },
    Error {
        code: ErrorCode,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success<T: Serialize>(value: T) -> Self {
        match serde_json::to_value(value) {
            Ok(result) => Self::Success { result },
            Err(e) => Self::Error {
                code: ErrorCode::SimError,
                message: e.to_string(),
                details: None,
            },
        }
    }

    pub fn failure(err: &OperationError) -> Self {
        Self::Error {
            code: err.code,
            message: err.message(),
            details: None,
        }
    }

    pub fn from_outcome<T: Serialize>(outcome: &Result<T, OperationError>) -> Self {
        match outcome {
            Ok(value) => Self::success(value),
            Err(e) => Self::failure(e),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// A handled call: the wire response plus the typed error behind an
/// `error` response.
#[derive(Debug)]
pub struct CallOutcome {
    pub response: MethodResponse,
    pub error: Option<OperationError>,
}

impl CallOutcome {
    fn from_result<T: Serialize>(outcome: Result<T, OperationError>) -> Self {
        Self {
            response: MethodResponse::from_outcome(&outcome),
            error: outcome.err(),
        }
    }

    fn not_implemented() -> Self {
        Self {
            response: MethodResponse::NotImplemented,
            error: None,
        }
    }
}

/// Dispatches channel calls onto a [`SimReader`].
pub struct SimReaderPlugin<B> {
    reader: SimReader<B>,
    channel: String,
}

impl<B: TelephonyBridge> SimReaderPlugin<B> {
    pub fn new(bridge: B, channel: impl Into<String>) -> Self {
        Self {
            reader: SimReader::new(bridge),
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn reader(&self) -> &SimReader<B> {
        &self.reader
    }

    pub fn handle(&self, call: &MethodCall) -> MethodResponse {
        self.handle_call(call).response
    }

    /// Like [`handle`](Self::handle), keeping the typed error.
    pub fn handle_call(&self, call: &MethodCall) -> CallOutcome {
        match Method::from_name(&call.method) {
            Some(method) => self.invoke(method),
            None => {
                debug!(channel = %self.channel, method = %call.method, "method not implemented");
                CallOutcome::not_implemented()
            }
        }
    }

    pub fn dispatch(&self, method: Method) -> MethodResponse {
        self.invoke(method).response
    }

    pub fn invoke(&self, method: Method) -> CallOutcome {
        match method {
            Method::GetSimInfo => CallOutcome::from_result(self.reader.get_sim_info()),
            Method::GetAllSimInfo => CallOutcome::from_result(self.reader.get_all_sim_info()),
            Method::HasSimCard => CallOutcome::from_result(self.reader.has_sim_card()),
            Method::GetNetworkInfo => CallOutcome::from_result(self.reader.get_network_info()),
        }
    }

    /// Decode a JSON call, handle it, and encode the response.
    pub fn handle_json(&self, call: &str) -> serde_json::Result<String> {
        let call: MethodCall = serde_json::from_str(call)?;
        serde_json::to_string(&self.handle(&call))
    }
}
