// src/settings.rs
//
// Persisted plotter settings, stored as JSON in the per-user config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::io::serial::DEFAULT_WRITE_TIMEOUT;
use crate::transfer::DEFAULT_BAUD_RATE;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlotterSettings {
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Port used when none is given on the command line
    #[serde(default)]
    pub default_port: Option<String>,
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
    /// File logging is enabled when set
    #[serde(default)]
    pub log_dir: Option<String>,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}
fn default_write_timeout_ms() -> u64 {
    DEFAULT_WRITE_TIMEOUT.as_millis() as u64
}

impl Default for PlotterSettings {
    fn default() -> Self {
        Self {
            baud_rate: default_baud_rate(),
            default_port: None,
            write_timeout_ms: default_write_timeout_ms(),
            log_dir: None,
        }
    }
}

/// `<config dir>/hpgl-sender/settings.json`
pub fn get_settings_path() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir().ok_or_else(|| "Failed to get config dir".to_string())?;
    Ok(config_dir.join("hpgl-sender").join("settings.json"))
}

/// Load settings, falling back to defaults when the file does not exist yet
pub fn load_settings(path: &Path) -> Result<PlotterSettings, String> {
    if !path.exists() {
        return Ok(PlotterSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read settings: {}", e))?;

    let settings: PlotterSettings = serde_json::from_str(&content)
        .map_err(|e| format!("Failed to parse settings: {}", e))?;

    if settings.baud_rate == 0 {
        return Err("Failed to parse settings: baud_rate must be non-zero".to_string());
    }
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &PlotterSettings) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config dir: {}", e))?;
    }

    let content = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    std::fs::write(path, content).map_err(|e| format!("Failed to write settings: {}", e))?;
    tlog!("[settings] Saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hpgl-sender-settings-{}-{}", tag, std::process::id()))
            .join("settings.json")
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = load_settings(Path::new("/nonexistent/hpgl-sender/settings.json")).unwrap();
        assert_eq!(settings, PlotterSettings::default());
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.default_port, None);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let path = temp_settings_path("partial");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "default_port": "/dev/ttyUSB0" }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.default_port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(settings.baud_rate, 9600);
        assert_eq!(settings.write_timeout_ms, 10_000);
        assert_eq!(
            std::time::Duration::from_millis(settings.write_timeout_ms),
            DEFAULT_WRITE_TIMEOUT
        );

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_save_creates_directory() {
        let path = temp_settings_path("save");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());

        let settings = PlotterSettings {
            baud_rate: 19200,
            default_port: Some("COM3".to_string()),
            ..PlotterSettings::default()
        };
        save_settings(&path, &settings).unwrap();
        assert_eq!(load_settings(&path).unwrap(), settings);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_zero_baud_rejected() {
        let path = temp_settings_path("zero");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "baud_rate": 0 }"#).unwrap();

        assert!(load_settings(&path).is_err());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_garbage_is_parse_error() {
        let path = temp_settings_path("garbage");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();

        let err = load_settings(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
