// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution.

use std::path::PathBuf;

const APP_DIR: &str = "sim-reader";
const CONFIG_FILE: &str = "config.json";

/// Return the application data directory. Nothing is created; the reader
/// only ever reads from it.
pub fn data_dir() -> PathBuf {
    base_dir(
        std::env::var("XDG_DATA_HOME").ok(),
        std::env::var("HOME").ok(),
    )
    .join(APP_DIR)
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    data_dir().join(CONFIG_FILE)
}

fn base_dir(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    // Try XDG data dir, then fallback to home
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg);
    }
    if let Some(home) = home.filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share");
    }
    // Last resort
    PathBuf::from("/tmp")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xdg_wins_over_home() {
        let dir = base_dir(Some("/xdg".into()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/xdg"));
    }

    #[test]
    fn home_falls_back_to_local_share() {
        let dir = base_dir(Some(String::new()), Some("/home/u".into()));
        assert_eq!(dir, PathBuf::from("/home/u/.local/share"));
    }

    #[test]
    fn nothing_set_uses_tmp() {
        assert_eq!(base_dir(None, None), PathBuf::from("/tmp"));
    }
}
