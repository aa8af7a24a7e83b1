//! Persisted settings for `~/.ponyshow/config.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs   # ConfigError
//! ├── paths.rs   # AppPaths (home, config file, serving root)
//! └── mod.rs     # Settings (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! theme = "default"           # Theme used when a deck doesn't pick one
//! locale = "en"               # Default language for new decks
//! interface = "127.0.0.1"     # Preview server interface
//! port = 8080                 # Preview server port (env PORT wins)
//! wsport = 8081               # Live reload socket port
//! open_browser = true         # Open the preview in a browser on start
//! ```
//!
//! Settings are re-read from disk at the start of every publish cycle, so
//! `pony config theme=ribbon` in another terminal takes effect on the next save.

mod error;
mod paths;

pub use error::ConfigError;
pub use paths::AppPaths;

use crate::log;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::Path,
};

/// Environment variable that overrides `port`.
pub const PORT_ENV: &str = "PORT";

/// Keys accepted by `pony config key=value`.
pub const KEYS: &[&str] = &["theme", "locale", "interface", "port", "wsport", "open_browser"];

/// Process-wide settings blob handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Theme directory name under `workspace/themes/`.
    pub theme: String,

    /// Default locale code.
    pub locale: String,

    /// Network interface the preview server binds.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Live reload socket port.
    pub wsport: u16,

    /// Launch the default browser once the server is bound.
    pub open_browser: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "default".into(),
            locale: "en".into(),
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 8080,
            wsport: 8081,
            open_browser: true,
        }
    }
}

impl Settings {
    /// Load settings from disk, warning about keys that aren't recognised.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (settings, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            log!("warning"; "unknown keys in {}: {}", path.display(), ignored.join(", "));
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse TOML content, collecting any unknown keys.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let settings = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((settings, ignored))
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(Self::parse_with_ignored(content)?.0)
    }

    /// Serialize and write settings to disk.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| ConfigError::Io(parent.to_path_buf(), err))?;
        }
        fs::write(path, content).map_err(|err| ConfigError::Io(path.to_path_buf(), err))
    }

    /// Set a single key from its string form (`pony config key=value`).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        match key {
            "theme" | "locale" if value.trim().is_empty() => return Err(invalid("must not be empty")),
            "theme" => self.theme = value.trim().to_string(),
            "locale" => self.locale = value.trim().to_string(),
            "interface" => self.interface = value.parse().map_err(|_| invalid("not an IP address"))?,
            "port" => self.port = value.parse().map_err(|_| invalid("not a port number"))?,
            "wsport" => self.wsport = value.parse().map_err(|_| invalid("not a port number"))?,
            "open_browser" => {
                self.open_browser = value.parse().map_err(|_| invalid("expected true or false"))?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// HTTP port with the `PORT` environment override applied.
    pub fn http_port(&self) -> u16 {
        port_override(std::env::var(PORT_ENV).ok().as_deref()).unwrap_or(self.port)
    }
}

/// Parse a port override, ignoring empty or malformed values.
fn port_override(value: Option<&str>) -> Option<u16> {
    value.and_then(|v| v.trim().parse().ok())
}

/// Split `key=value` as accepted by `pony config`.
pub fn parse_assignment(arg: &str) -> Result<(&str, &str), ConfigError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(ConfigError::Assignment(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_str("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.wsport, 8081);
        assert_eq!(settings.theme, "default");
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_str("theme = \"ribbon\"\nport = 3000").unwrap();
        assert_eq!(settings.theme, "ribbon");
        assert_eq!(settings.port, 3000);
        // wsport uses default
        assert_eq!(settings.wsport, 8081);
    }

    #[test]
    fn test_unknown_keys_collected() {
        let (settings, ignored) = Settings::parse_with_ignored("colour = \"red\"\nport = 1").unwrap();
        assert_eq!(settings.port, 1);
        assert_eq!(ignored, vec!["colour".to_string()]);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Settings::from_str("port = \"not a number\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let mut settings = Settings::default();
        settings.set("theme", "ribbon").unwrap();
        settings.set("wsport", "9001").unwrap();
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.theme, "ribbon");
        assert_eq!(loaded.wsport, 9001);
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        assert!(matches!(Settings::load(&path), Err(ConfigError::Io(..))));
        assert_eq!(Settings::load_or_default(&path).unwrap(), Settings::default());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set("port", "eighty"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("interface", "localhost:1"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("theme", "  "),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            settings.set("colour", "red"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_set_every_key() {
        let mut settings = Settings::default();
        for key in KEYS {
            let value = match *key {
                "interface" => "0.0.0.0",
                "port" | "wsport" => "1234",
                "open_browser" => "false",
                _ => "de",
            };
            settings.set(key, value).unwrap();
        }
        assert_eq!(settings.locale, "de");
        assert_eq!(settings.port, 1234);
        assert!(!settings.open_browser);
    }

    #[test]
    fn test_port_override() {
        assert_eq!(port_override(Some("3000")), Some(3000));
        assert_eq!(port_override(Some(" 3001 ")), Some(3001));
        assert_eq!(port_override(Some("")), None);
        assert_eq!(port_override(Some("http")), None);
        assert_eq!(port_override(None), None);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(parse_assignment("theme=ribbon").unwrap(), ("theme", "ribbon"));
        assert_eq!(parse_assignment("locale=").unwrap(), ("locale", ""));
        assert!(parse_assignment("theme").is_err());
        assert!(parse_assignment("=x").is_err());
    }
}
