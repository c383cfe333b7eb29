//! Client settings file.
//!
//! A small JSON document; any field may be omitted and a damaged file never
//! stops the client, it just means defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use voxide_engine::world::WorldConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seconds between polled autosaves.
    pub autosave_secs: u64,
    /// Radius, in chunks, of the square kept in view around the player.
    pub render_distance: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave_secs: 300,
            render_distance: 2,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing file is the normal first-run
    /// case; an unparsable one is logged and ignored.
    pub fn load_or_default(path: &Path) -> Self {
        let Ok(bytes) = fs::read(path) else {
            return Self::default();
        };
        match serde_json::from_slice(&bytes) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("settings file {} is invalid, using defaults: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs)
    }

    /// The world-store view of these settings.
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            autosave_interval: self.autosave_interval(),
            render_distance: self.render_distance,
        }
    }
}
