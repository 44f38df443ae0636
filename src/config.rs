//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/orgtree/orgtree.toml`
//! 3. Local config: `./.orgtree.toml` or the file passed with `--config`
//! 4. Environment variables: `ORGTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::NO_PARENT;

/// Unified configuration for orgtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Hierarchy file used when no file is given on the command line
    pub source: Option<PathBuf>,
    /// Nodes at this depth or shallower start expanded (0: roots only)
    pub expand_depth: usize,
    /// Parent identifier meaning "no parent"
    pub sentinel: String,
    /// Colored output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            expand_depth: 0,
            sentinel: NO_PARENT.to_string(),
            color: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub source: Option<PathBuf>,
    pub expand_depth: Option<usize>,
    pub sentinel: Option<String>,
    pub color: Option<bool>,
}

/// Get the XDG config directory for orgtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orgtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("orgtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".orgtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            source: overlay.source.clone().or_else(|| self.source.clone()),
            expand_depth: overlay.expand_depth.unwrap_or(self.expand_depth),
            sentinel: overlay
                .sentinel
                .clone()
                .unwrap_or_else(|| self.sentinel.clone()),
            color: overlay.color.unwrap_or(self.color),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(source) = &self.source {
            let expanded = expand_env_vars(source.to_string_lossy().as_ref());
            self.source = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file; falls back to `./.orgtree.toml`
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config; an explicit path must exist
        match local {
            Some(path) => {
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
            None => {
                let local_path = local_config_path(Path::new("."));
                if local_path.exists() {
                    let raw = load_raw_settings(&local_path)?;
                    current = current.merge_with(&raw);
                }
            }
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ORGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ORGTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("source") {
            settings.source = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("expand_depth") {
            settings.expand_depth = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("ORGTREE_EXPAND_DEPTH must not be negative: {val}"),
            })?;
        }
        if let Ok(val) = config.get_string("sentinel") {
            settings.sentinel = val;
        }
        if let Ok(val) = config.get_bool("color") {
            settings.color = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# orgtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/orgtree/orgtree.toml
#   Local:  ./.orgtree.toml (or --config FILE)
#   Env:    ORGTREE_* environment variables

# Hierarchy file (.json or .toml) used when none is given
# source = "~/org/hierarchy.json"

# Nodes at this depth or shallower start expanded (0: roots only)
# expand_depth = 0

# Parent identifier meaning "no parent"
# sentinel = "-1"

# Colored output
# color = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_roots_only_policy() {
        let settings = Settings::default();
        assert_eq!(settings.expand_depth, 0);
        assert_eq!(settings.sentinel, "-1");
        assert!(settings.source.is_none());
        assert!(settings.color);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            expand_depth: Some(2),
            ..Default::default()
        };
        let merged = base.merge_with(&overlay);
        assert_eq!(merged.expand_depth, 2);
        assert_eq!(merged.sentinel, "-1");
        assert!(merged.color);
    }

    #[test]
    fn given_tilde_in_source_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            source: Some(PathBuf::from("~/org.json")),
            ..Default::default()
        };
        settings.expand_paths();
        let source = settings.source.unwrap();
        assert!(!source.to_string_lossy().starts_with('~'));
        assert!(source.ends_with("org.json"));
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.expand_depth.is_none());
    }
}
