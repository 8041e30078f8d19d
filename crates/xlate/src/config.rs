//! Configuration for translations.
//!
//! Loads config from:
//! 1. Global: ~/.config/xlate/config.toml
//! 2. Per-project: .xlate/config.toml (overrides global per key)
//!
//! Example config.toml:
//! ```toml
//! indent_width = 2
//! max_blank_lines = 1
//! preserve_comments = true
//! emit_main_wrapper = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Layout options shared by all targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Longest run of blank lines kept from the source.
    pub max_blank_lines: usize,
    /// Carry source comments into the output.
    pub preserve_comments: bool,
    /// Wrap C output in `int main() { ... }` with includes.
    pub emit_main_wrapper: bool,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            max_blank_lines: 1,
            preserve_comments: true,
            emit_main_wrapper: true,
        }
    }
}

/// Keys set in one config file; unset keys leave the layer below alone.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    indent_width: Option<usize>,
    max_blank_lines: Option<usize>,
    preserve_comments: Option<bool>,
    emit_main_wrapper: Option<bool>,
}

impl ConfigLayer {
    fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TranslateConfig {
    /// Load configuration for a project.
    ///
    /// Starts from defaults, applies the global config, then the per-project
    /// `.xlate/config.toml` under `root`. Unreadable files are skipped.
    pub fn load(root: &Path) -> Self {
        Self::load_layers(Self::global_config_path().as_deref(), root)
    }

    fn load_layers(global: Option<&Path>, root: &Path) -> Self {
        let project = root.join(".xlate").join("config.toml");
        global
            .into_iter()
            .chain(std::iter::once(project.as_path()))
            .filter_map(|path| ConfigLayer::read(path).ok())
            .fold(Self::default(), Self::merge)
    }

    /// Apply the keys a layer sets on top of `self`.
    fn merge(self, layer: ConfigLayer) -> Self {
        Self {
            indent_width: layer.indent_width.unwrap_or(self.indent_width),
            max_blank_lines: layer.max_blank_lines.unwrap_or(self.max_blank_lines),
            preserve_comments: layer.preserve_comments.unwrap_or(self.preserve_comments),
            emit_main_wrapper: layer.emit_main_wrapper.unwrap_or(self.emit_main_wrapper),
        }
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("xlate").join("config.toml"))
    }

    /// Load config from a file path.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self::default().merge(ConfigLayer::read(path)?))
    }

    /// One indentation level as spaces.
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }
}
