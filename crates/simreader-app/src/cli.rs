// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use simreader_core::error::{Result, SimReaderError};
use simreader_plugin::{Method, MethodCall};

#[derive(Debug, Parser)]
#[command(
    name = "sim-reader",
    version,
    about = "Read SIM and cellular network metadata as normalized JSON"
)]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Default, Args)]
pub struct GlobalOptions {
    /// Serve telephony data from a recorded snapshot instead of the device.
    #[arg(long, global = true, env = "SIM_READER_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Configuration file. Defaults to `<data dir>/sim-reader/config.json`.
    #[arg(long, global = true, env = "SIM_READER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pretty-print the JSON report.
    #[arg(long, global = true)]
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Primary SIM as a single record.
    SimInfo,
    /// One record per active subscription.
    AllSimInfo,
    /// Whether a usable SIM is inserted.
    HasSim,
    /// Current network attachment.
    NetworkInfo,
    /// Send a raw method call through the channel dispatcher.
    Call {
        /// Method name, e.g. `getAllSimInfo`.
        method: String,
        /// Call arguments as JSON. Accepted and ignored by every method.
        #[arg(long)]
        arguments: Option<String>,
    },
    /// Print an example snapshot to start a recording from.
    SnapshotTemplate,
}

impl Command {
    /// The channel call this command stands for, or `None` for commands that
    /// never touch the channel.
    pub fn method_call(&self) -> Result<Option<MethodCall>> {
        let method = match self {
            Self::SimInfo => Method::GetSimInfo,
            Self::AllSimInfo => Method::GetAllSimInfo,
            Self::HasSim => Method::HasSimCard,
            Self::NetworkInfo => Method::GetNetworkInfo,
            Self::Call { method, arguments } => {
                let mut call = MethodCall::new(method.as_str());
                if let Some(raw) = arguments {
                    call.arguments = serde_json::from_str(raw).map_err(|e| {
                        SimReaderError::Config(format!("invalid --arguments JSON: {e}"))
                    })?;
                }
                return Ok(Some(call));
            }
            Self::SnapshotTemplate => return Ok(None),
        };
        Ok(Some(MethodCall::new(method.name())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn subcommands_map_to_channel_methods() {
        let cli = Cli::try_parse_from(["sim-reader", "all-sim-info"]).unwrap();
        let call = cli.command.method_call().unwrap().unwrap();
        assert_eq!(call.method, "getAllSimInfo");

        let cli = Cli::try_parse_from(["sim-reader", "has-sim"]).unwrap();
        let call = cli.command.method_call().unwrap().unwrap();
        assert_eq!(call.method, "hasSimCard");
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "sim-reader",
            "network-info",
            "--pretty",
            "--snapshot",
            "device.json",
        ])
        .unwrap();
        assert!(cli.options.pretty);
        assert_eq!(cli.options.snapshot, Some(PathBuf::from("device.json")));
        assert_eq!(cli.command, Command::NetworkInfo);
    }

    #[test]
    fn raw_call_carries_arguments() {
        let cli = Cli::try_parse_from([
            "sim-reader",
            "call",
            "getSignalStrength",
            "--arguments",
            r#"{"slot":1}"#,
        ])
        .unwrap();
        let call = cli.command.method_call().unwrap().unwrap();
        assert_eq!(call.method, "getSignalStrength");
        assert_eq!(call.arguments, json!({ "slot": 1 }));
    }

    #[test]
    fn malformed_arguments_are_a_config_error() {
        let command = Command::Call {
            method: "getSimInfo".into(),
            arguments: Some("{".into()),
        };
        assert!(matches!(command.method_call(), Err(SimReaderError::Config(_))));
    }

    #[test]
    fn template_needs_no_channel() {
        assert!(Command::SnapshotTemplate.method_call().unwrap().is_none());
    }
}
