// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolves configuration, picks the telephony bridge, and runs channel calls.

use std::path::Path;

use simreader_bridge::platform_bridge;
use simreader_bridge::snapshot::{SnapshotBridge, TelephonySnapshot};
use simreader_bridge::traits::TelephonyBridge;
use simreader_core::ReaderConfig;
use simreader_core::error::Result;
use simreader_plugin::{CallOutcome, MethodCall, SimReaderPlugin};
use tracing::info;

use super::data_dir;
use crate::cli::GlobalOptions;

/// Load the config file and apply command-line overrides.
pub fn resolve_config(options: &GlobalOptions) -> Result<ReaderConfig> {
    let path = options
        .config
        .clone()
        .unwrap_or_else(data_dir::default_config_path);
    let mut config = ReaderConfig::load(&path)?;
    if options.snapshot.is_some() {
        config.snapshot_path = options.snapshot.clone();
    }
    if options.pretty {
        config.pretty_output = true;
    }
    Ok(config)
}

pub struct ReaderServices {
    plugin: SimReaderPlugin<Box<dyn TelephonyBridge>>,
}

impl ReaderServices {
    /// Build the plugin over a snapshot when configured, else the device.
    pub fn new(config: &ReaderConfig) -> Result<Self> {
        let bridge: Box<dyn TelephonyBridge> = match &config.snapshot_path {
            Some(path) => Box::new(load_snapshot(path)?),
            None => platform_bridge(),
        };
        info!(
            platform = bridge.platform_name(),
            channel = %config.channel_name,
            "reader services initialised"
        );
        Ok(Self {
            plugin: SimReaderPlugin::new(bridge, config.channel_name.clone()),
        })
    }

    pub fn platform_name(&self) -> &str {
        self.plugin.reader().platform_name()
    }

    pub fn channel(&self) -> &str {
        self.plugin.channel()
    }

    pub fn invoke(&self, call: &MethodCall) -> CallOutcome {
        self.plugin.handle_call(call)
    }
}

fn load_snapshot(path: &Path) -> Result<SnapshotBridge> {
    info!(path = %path.display(), "loading telephony snapshot");
    Ok(SnapshotBridge::new(TelephonySnapshot::from_json_file(path)?))
}
