//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    /// Course backend origin; the fixed list query is appended to it.
    pub api_base: String,

    // View
    pub auto_refresh: bool,
    pub show_hour_grid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            api_base: DEFAULT_API_BASE.to_string(),
            auto_refresh: true,
            show_hour_grid: true,
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert!(settings.auto_refresh);
        assert!(settings.show_hour_grid);
        assert!(settings.window_w.is_none());
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"api_base": "http://localhost:8080", "auto_refresh": false}"#)
                .unwrap();
        assert_eq!(settings.api_base, "http://localhost:8080");
        assert!(!settings.auto_refresh);
        assert!(settings.show_hour_grid);
    }
}
