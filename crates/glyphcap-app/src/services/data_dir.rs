// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware data directory resolution and settings persistence.

use std::path::{Path, PathBuf};

use glyphcap_core::config::{self, ScanConfig};
use glyphcap_core::error::{GlyphcapError, Result};
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "config.json";

/// Return the application data directory, creating it if needed.
pub fn data_dir() -> PathBuf {
    let dir = config::app_data_dir();
    if let Err(err) = std::fs::create_dir_all(&dir) {
        warn!(path = %dir.display(), error = %err, "Could not create data directory");
    }
    dir
}

/// Path of the settings file inside `data_dir`.
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load persisted settings. A missing file yields the defaults; an unreadable
/// or malformed one is a `Config` error.
pub fn load_config(data_dir: &Path) -> Result<ScanConfig> {
    let path = config_path(data_dir);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(ScanConfig::default());
        }
        Err(err) => {
            return Err(GlyphcapError::Config(format!(
                "cannot read {}: {}",
                path.display(),
                err
            )));
        }
    };
    serde_json::from_str(&data).map_err(|err| {
        GlyphcapError::Config(format!("malformed settings in {}: {}", path.display(), err))
    })
}

/// Write settings as pretty JSON into `data_dir`.
pub fn persist_config(data_dir: &Path, config: &ScanConfig) -> Result<()> {
    let path = config_path(data_dir);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "Settings saved");
    Ok(())
}
