//! Optional viewer configuration
//!
//! The viewer reads `assets/viewer.ron` at startup to override the built-in
//! light presets. A missing file is the normal case and stays quiet; a file
//! that does not parse logs a warning and the defaults stand. The viewer
//! never writes this file.

use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::lighting::LightRig;

/// Where the viewer looks for its config, relative to the working directory
pub const CONFIG_PATH: &str = "assets/viewer.ron";

/// Startup settings loadable from RON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// The lights the viewer starts with
    pub rig: LightRig,
}

impl ViewerConfig {
    /// Load a config file, falling back to the defaults when the file is
    /// absent or malformed.
    pub fn load_or_default(path: &Path) -> ViewerConfig {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!("no viewer config at {}, using defaults", path.display());
                return ViewerConfig::default();
            }
        };

        match ron::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring malformed config {}: {}", path.display(), e);
                ViewerConfig::default()
            }
        }
    }
}
