use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::utils::file::read_file;

/// Settings structure for the converter CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Template directory or http(s) base URL holding `index.json`
    pub template_source: String,
    /// Template file used when none is given on the command line
    pub default_template: Option<String>,
    pub output_file: String,
    pub log_level: String,
}

// Default value functions for serde
pub fn default_template_source() -> String {
    "templates".to_string()
}

pub fn default_output_file() -> String {
    "mihomo-config.yaml".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            template_source: default_template_source(),
            default_template: None,
            output_file: default_output_file(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file; no path means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = read_file(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        Self::load_from_content(&content, extension.as_deref())
            .with_context(|| format!("Failed to parse settings file {}", path.display()))
    }

    /// Parse settings text; `format` is a file extension hint (`yaml`, `yml`, `toml`).
    pub fn load_from_content(content: &str, format: Option<&str>) -> Result<Self> {
        match format {
            Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(content)?),
            Some("toml") => Ok(toml::from_str(content)?),
            _ => {
                // Try YAML first, then TOML
                if let Ok(settings) = serde_yaml::from_str::<Settings>(content) {
                    debug!("Settings parsed as YAML");
                    return Ok(settings);
                }
                match toml::from_str::<Settings>(content) {
                    Ok(settings) => {
                        debug!("Settings parsed as TOML");
                        Ok(settings)
                    }
                    Err(err) => bail!("settings are neither YAML nor TOML: {}", err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.template_source, "templates");
        assert_eq!(settings.output_file, "mihomo-config.yaml");
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.default_template, None);
    }

    #[test]
    fn test_yaml_partial() {
        let settings = Settings::load_from_content(
            "template_source: https://example.com/tpl\ndefault_template: base.yaml\n",
            Some("yaml"),
        )
        .unwrap();
        assert_eq!(settings.template_source, "https://example.com/tpl");
        assert_eq!(settings.default_template.as_deref(), Some("base.yaml"));
        assert_eq!(settings.output_file, "mihomo-config.yaml");
    }

    #[test]
    fn test_toml() {
        let settings =
            Settings::load_from_content("log_level = \"debug\"\noutput_file = \"out.yaml\"\n", Some("toml"))
                .unwrap();
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.output_file, "out.yaml");
    }

    #[test]
    fn test_unknown_extension_falls_back_to_toml() {
        let settings = Settings::load_from_content("log_level = \"warn\"\n", None).unwrap();
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_invalid_content() {
        assert!(Settings::load_from_content("log_level = [", None).is_err());
    }
}
