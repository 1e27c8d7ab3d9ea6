//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/umlgen/umlgen.toml`
//! 3. Local config: `./.umlgen.toml`, or the file passed with `--config`
//! 4. Environment variables: `UMLGEN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::generator::{ArtifactPaths, DEFAULT_INDENT};
use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// File name of the project-local config.
pub const LOCAL_CONFIG_FILE: &str = ".umlgen.toml";

/// Unified configuration for umlgen.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Model document read when no input is given on the command line
    pub input: PathBuf,
    /// Directory receiving the generated artifacts
    pub output_dir: PathBuf,
    /// File name of the hierarchy document
    pub hierarchy_file: String,
    /// File name of the metadata list
    pub metadata_file: String,
    /// Indentation width for both artifacts
    pub indent: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("test_input.xml"),
            output_dir: PathBuf::from("./out"),
            hierarchy_file: "config.xml".into(),
            metadata_file: "meta.json".into(),
            indent: DEFAULT_INDENT,
        }
    }
}

/// Raw settings for intermediate parsing.
///
/// `None` means "not specified in this layer, inherit from below".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub hierarchy_file: Option<String>,
    pub metadata_file: Option<String>,
    pub indent: Option<usize>,
}

/// Get the XDG config directory for umlgen.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "umlgen").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("umlgen.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `local_config` replaces the default `./.umlgen.toml`; unlike the default,
    /// an explicitly given file must exist.
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        let local = match local_config {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => Some(local_config_path(Path::new("."))),
        };
        let mut current = Self::load_files(global_config_path().as_deref(), local.as_deref())?;
        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Defaults plus the given config files, without environment overrides.
    ///
    /// Missing files are skipped.
    pub fn load_files(
        global: Option<&Path>,
        local: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();
        for path in [global, local].into_iter().flatten() {
            if path.exists() {
                debug!("config layer: {}", path.display());
                let raw = load_raw_settings(path)?;
                current = current.merge_with(&raw);
            }
        }
        Ok(current)
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            input: overlay.input.clone().unwrap_or_else(|| self.input.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            hierarchy_file: overlay
                .hierarchy_file
                .clone()
                .unwrap_or_else(|| self.hierarchy_file.clone()),
            metadata_file: overlay
                .metadata_file
                .clone()
                .unwrap_or_else(|| self.metadata_file.clone()),
            indent: overlay.indent.unwrap_or(self.indent),
        }
    }

    /// Apply UMLGEN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("UMLGEN").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("input") {
            settings.input = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("hierarchy_file") {
            settings.hierarchy_file = val;
        }
        if let Ok(val) = config.get_string("metadata_file") {
            settings.metadata_file = val;
        }
        if let Ok(val) = config.get_int("indent") {
            settings.indent = usize::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("UMLGEN_INDENT must not be negative: {val}"),
            })?;
        }
        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.input = PathBuf::from(expand_env_vars(&self.input.to_string_lossy()));
        self.output_dir = PathBuf::from(expand_env_vars(&self.output_dir.to_string_lossy()));
    }

    /// Artifact locations, optionally in a different output directory.
    pub fn artifact_paths(&self, output_dir: Option<&Path>) -> ArtifactPaths {
        ArtifactPaths::in_dir(
            output_dir.unwrap_or(self.output_dir.as_path()),
            &self.hierarchy_file,
            &self.metadata_file,
        )
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# umlgen configuration
# Global: ~/.config/umlgen/umlgen.toml, local: ./.umlgen.toml
# Environment overrides: UMLGEN_INPUT, UMLGEN_OUTPUT_DIR, UMLGEN_INDENT, ...

# Model document used when no input is given
# input = "test_input.xml"

# Directory for generated artifacts (~ and $VAR are expanded)
# output_dir = "./out"

# hierarchy_file = "config.xml"
# metadata_file = "meta.json"

# Indentation width of the generated XML and JSON
# indent = 4
"#
        .to_string()
    }
}
