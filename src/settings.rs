use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::track::CanvasFit;

/// One JSON file per user under the platform config directory
/// (`~/.config/rat-run/settings.json` on Linux), or the working directory
/// when the platform has none.
fn settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rat-run")
        .join("settings.json")
}

/// Tunables for a run.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Sensor grid
    pub spacing: f64,
    pub max_per_segment: usize,

    // Traversal
    /// Distance covered per tick
    pub speed: f64,
    pub finish_tolerance: f64,
    /// Ticks before a triggered obstacle clears itself
    pub unblock_delay_ticks: u64,

    // Layout, `None` keeps waypoints where they are
    pub canvas: Option<CanvasFit>,

    // Headless runner
    pub max_ticks: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            max_per_segment: 26,

            speed: 1.8,
            finish_tolerance: 12.0,
            unblock_delay_ticks: 60, // about a second at 60 fps

            canvas: Some(CanvasFit::default()),

            max_ticks: 20_000,
        }
    }
}

impl Settings {
    /// Parse settings from JSON, falling back to defaults on error.
    pub fn parse(contents: &str) -> Self {
        match serde_json::from_str(contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Failed to parse settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        let path = settings_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                log::info!("Loaded settings from {}", path.display());
                Self::parse(&contents)
            }
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Whether a settings file exists yet
    pub fn is_saved() -> bool {
        settings_path().exists()
    }

    /// Save settings to disk as pretty JSON. Failures are logged, never fatal.
    pub fn save(&self) {
        let path = settings_path();
        match self.write_to(&path) {
            Ok(()) => log::info!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("Failed to write settings to {}: {}", path.display(), e),
        }
    }

    fn write_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
