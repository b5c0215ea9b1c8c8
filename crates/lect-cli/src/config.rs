//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use lect_player::DEFAULT_MEDIA_PATH;

/// Default answering-service base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Configuration for lect
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the answering service
    pub api_url: Option<String>,
    /// Media source URL (defaults to the service's default video endpoint)
    pub media_url: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lect")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for LECT_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("LECT_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            api_url: Some(DEFAULT_API_URL.to_string()),
            media_url: None,
        };

        default_config.save()?;
        Ok(path)
    }

    /// Resolve the service base URL: CLI flag, then config, then default
    pub fn resolve_api_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Resolve the media URL: CLI flag, then config, then the service's
    /// default video endpoint.
    pub fn resolve_media_url(&self, flag: Option<&str>, api_url: &str) -> String {
        flag.map(str::to_string)
            .or_else(|| self.media_url.clone())
            .unwrap_or_else(|| format!("{}{}", api_url, DEFAULT_MEDIA_PATH))
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# lect configuration file
# Place at ~/.config/lect/config.toml (Linux/Mac) or %APPDATA%\lect\config.toml (Windows)

# Base URL of the answering service
api_url = "http://localhost:8000"

# Media source URL (optional)
# Defaults to <api_url>/api/video/default
# media_url = "http://localhost:8000/api/video/default"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_precedence() {
        let config = Config {
            api_url: Some("http://from-config".into()),
            media_url: None,
        };
        assert_eq!(
            config.resolve_api_url(Some("http://from-flag")),
            "http://from-flag"
        );
        assert_eq!(config.resolve_api_url(None), "http://from-config");
        assert_eq!(Config::default().resolve_api_url(None), DEFAULT_API_URL);
    }

    #[test]
    fn test_media_url_defaults_to_service_endpoint() {
        let config = Config::default();
        assert_eq!(
            config.resolve_media_url(None, "http://localhost:8000"),
            "http://localhost:8000/api/video/default"
        );
    }

    #[test]
    fn test_example_config_parses() {
        let parsed: Config = toml::from_str(example_config()).unwrap();
        assert_eq!(parsed.api_url.as_deref(), Some("http://localhost:8000"));
    }
}
