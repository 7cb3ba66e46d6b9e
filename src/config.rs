//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bstviz/bstviz.toml`
//! 3. Local config: `<project_dir>/.bstviz.toml`, or an explicit `--config` file
//! 4. Environment variables: `BSTVIZ_*` prefix, `__` between nested keys

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::Palette;

/// Where dump artifacts go and how they are rendered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DumpSettings {
    /// Root directory for all dump output
    pub logs_dir: PathBuf,
    /// Graph files, relative to `logs_dir`
    pub dot_dir: PathBuf,
    /// Rendered images, relative to `logs_dir`
    pub image_dir: PathBuf,
    /// Visual log file, relative to `logs_dir`
    pub log_file: PathBuf,
    /// Graphviz executable
    pub dot_command: String,
    /// Output format passed as `-T<format>`, also the image extension
    pub image_format: String,
    /// Invoke the renderer at all
    pub render: bool,
}

impl Default for DumpSettings {
    fn default() -> Self {
        Self {
            logs_dir: PathBuf::from("logs"),
            dot_dir: PathBuf::from("dot"),
            image_dir: PathBuf::from("img"),
            log_file: PathBuf::from("tree.html"),
            dot_command: "dot".into(),
            image_format: "png".into(),
            render: true,
        }
    }
}

/// Node fill colors used in dumps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorSettings {
    pub root: String,
    pub node: String,
    pub leaf: String,
    pub highlight: String,
}

impl Default for ColorSettings {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            root: palette.root,
            node: palette.node,
            leaf: palette.leaf,
            highlight: palette.highlight,
        }
    }
}

impl From<&ColorSettings> for Palette {
    fn from(colors: &ColorSettings) -> Self {
        Self {
            root: colors.root.clone(),
            node: colors.node.clone(),
            leaf: colors.leaf.clone(),
            highlight: colors.highlight.clone(),
        }
    }
}

/// Unified configuration for bstviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Default arena capacity for CLI commands
    pub capacity: usize,
    /// Dump output settings
    pub dump: DumpSettings,
    /// Node colors
    pub colors: ColorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capacity: 32,
            dump: DumpSettings::default(),
            colors: ColorSettings::default(),
        }
    }
}

/// Get the XDG config directory for bstviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bstviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bstviz.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".bstviz.toml")
}

/// Expand `~`, `$VAR` and `${VAR}`, leaving the input untouched on lookup errors.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// The local layer is `<project_dir>/.bstviz.toml` (current directory
    /// when `None`) and is skipped when absent.
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let project_dir = project_dir.unwrap_or(Path::new("."));
        Self::build(local_config_path(project_dir), false)
    }

    /// Load settings with an explicit config file in place of the local layer.
    ///
    /// Unlike [`Settings::load`], a missing file is an error.
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        Self::build(path.to_path_buf(), true)
    }

    /// Merge all layers; `required` applies to the local layer only.
    fn build(local_path: PathBuf, required: bool) -> Result<Self, ApplicationError> {
        // 1. Compiled defaults
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Settings::default()).map_err(config_err)?);

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        // 3. Local or explicit config
        builder = builder.add_source(File::from(local_path).required(required));

        // 4. Environment variables (explicit override)
        builder = builder.add_source(
            Environment::with_prefix("BSTVIZ")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        // Expand ~ and $VAR in path-like fields
        settings.expand_paths();

        Ok(settings)
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.dump.logs_dir.to_string_lossy().as_ref());
        self.dump.logs_dir = PathBuf::from(expanded);

        self.dump.dot_command = expand_env_vars(&self.dump.dot_command);
    }

    /// Palette for graph dumps.
    pub fn palette(&self) -> Palette {
        Palette::from(&self.colors)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r##"# bstviz configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bstviz/bstviz.toml
#   Local:  ./.bstviz.toml  (or --config <file>)
#   Env:    BSTVIZ_* environment variables, e.g. BSTVIZ_DUMP__LOGS_DIR=/tmp/logs

# Arena capacity used when a command does not pass --capacity
# capacity = 32

[dump]
# Root directory for dump output (graph files, images, visual log)
# logs_dir = "logs"

# Subdirectories of logs_dir
# dot_dir = "dot"
# image_dir = "img"

# Visual log file inside logs_dir
# log_file = "tree.html"

# Graphviz executable and output format
# dot_command = "dot"
# image_format = "png"

# Set to false to write graph files without rendering images
# render = true

[colors]
# root = "#f4acb7"
# node = "#d8e2dc"
# leaf = "#ffe5d9"
# highlight = "#9d8189"
"##
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
