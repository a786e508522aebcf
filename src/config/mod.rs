use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Endpoint configuration. Lives as JSON in the platform config dir;
/// everything optional so the app works fully offline out of the box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Spreadsheet web-app endpoint for fetch/append.
    pub(crate) sheet_url: Option<String>,
    /// Key-based push notification provider endpoint.
    pub(crate) push_url: Option<String>,
    /// How long a fetched sheet payload stays fresh.
    pub(crate) cache_ttl_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sheet_url: None,
            push_url: None,
            cache_ttl_secs: 300,
        }
    }
}

impl Settings {
    /// Load from `path`; a missing file is just the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        let settings = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed settings file: {}", path.display()))?;
        Ok(settings)
    }

    pub(crate) fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }
}

pub(crate) fn default_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "piggybank", "piggybank")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(proj_dirs.config_dir().join("settings.json"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.sheet_url.is_none());
        assert!(s.push_url.is_none());
        assert_eq!(s.cache_ttl_secs, 300);
    }

    #[test]
    fn test_missing_file_is_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load(&dir.path().join("nope.json")).unwrap();
        assert!(s.sheet_url.is_none());
    }

    #[test]
    fn test_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let s = Settings {
            sheet_url: Some("https://script.example.com/exec".into()),
            push_url: Some("https://push.example.com/send".into()),
            cache_ttl_secs: 60,
        };
        s.save(&path).unwrap();
        let back = Settings::load(&path).unwrap();
        assert_eq!(back.sheet_url.as_deref(), Some("https://script.example.com/exec"));
        assert_eq!(back.push_url.as_deref(), Some("https://push.example.com/send"));
        assert_eq!(back.cache_ttl_secs, 60);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "sheet_url": "https://x" }"#).unwrap();
        let s = Settings::load(&path).unwrap();
        assert_eq!(s.sheet_url.as_deref(), Some("https://x"));
        assert_eq!(s.cache_ttl_secs, 300);
    }

    #[test]
    fn test_malformed_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(Settings::load(&path).is_err());
    }
}
