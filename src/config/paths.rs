//! Application directories.
//!
//! ```text
//! ~/.ponyshow/
//! ├── config.toml
//! └── workspace/              # serving root
//!     ├── index.html
//!     ├── assets/
//!     └── themes/default/style.css
//! ```

use super::{ConfigError, Settings};
use crate::log;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable that relocates the app home (defaults to `~/.ponyshow`).
pub const HOME_ENV: &str = "PONYSHOW_HOME";

const DEFAULT_HOME: &str = "~/.ponyshow";

/// Resolved application directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    home: PathBuf,
}

impl AppPaths {
    /// Resolve the app home from `PONYSHOW_HOME`, else `~/.ponyshow`.
    pub fn resolve() -> Result<Self, ConfigError> {
        let raw = std::env::var(HOME_ENV).unwrap_or_else(|_| DEFAULT_HOME.to_string());
        let expanded = shellexpand::tilde(&raw).into_owned();
        if expanded.starts_with('~') {
            return Err(ConfigError::Home(raw));
        }
        Ok(Self::at(expanded))
    }

    /// Use an explicit home directory.
    pub fn at(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn config_file(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// The fixed serving root.
    pub fn workspace(&self) -> PathBuf {
        self.home.join("workspace")
    }

    /// Create the home and serving root, writing default settings on first run.
    ///
    /// Returns `true` when this was the first run.
    pub fn ensure(&self) -> Result<bool, ConfigError> {
        let workspace = self.workspace();
        fs::create_dir_all(&workspace).map_err(|err| ConfigError::Io(workspace.clone(), err))?;

        let config_file = self.config_file();
        let first_run = !config_file.exists();
        if first_run {
            Settings::default().save(&config_file)?;
            log!("init"; "created {}", config_file.display());
        }

        crate::embed::write_embedded_assets(&workspace)
            .map_err(|err| ConfigError::Io(workspace, err))?;
        Ok(first_run)
    }
}
