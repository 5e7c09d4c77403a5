use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::Variant;

/// Optional settings file, looked up in the working directory.
pub const CONFIG_FILE: &str = "persona-dash.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup settings. Every field has a default, so the file may list only
/// what it changes:
///
/// ```json
/// { "variant": "classic", "data_path": "data/personality.csv" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    /// Column holding the personality class.
    pub class_column: String,
    pub variant: Variant,
    /// Initial window size in points.
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("personality_dataset.csv"),
            class_column: "Personality".to_string(),
            variant: Variant::default(),
            window_size: [1200.0, 800.0],
        }
    }
}

impl DashboardConfig {
    /// Read the config file; a missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Load [`CONFIG_FILE`], falling back to defaults when it is unusable.
    pub fn load() -> Self {
        match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Ignoring configuration: {e:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::from_file(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.variant, Variant::Extended);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{ "variant": "classic", "class_column": "Type" }"#)
            .unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.variant, Variant::Classic);
        assert_eq!(config.class_column, "Type");
        assert_eq!(config.data_path, PathBuf::from("personality_dataset.csv"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "{ variant: ").unwrap();
        assert!(DashboardConfig::from_file(&path).is_err());
    }
}
