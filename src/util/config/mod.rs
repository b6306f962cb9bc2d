//! Console configuration
//!
//! Settings are read from a TOML file. Every field has a default, so a
//! partial file (or no file at all) is fine.
//!
//! ```text
//! Priority (high -> low):
//! 1. CLI arguments
//! 2. --config <FILE>
//! 3. User-level (~/.config/yaoxiang/console.toml)
//! 4. Default values
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repl::context::DEFAULT_LABEL;
use crate::repl::formatter::DEFAULT_DESCRIPTION_LIMIT;
use crate::repl::source::DEFAULT_EXIT_COMMANDS;
use crate::runtime::interpreter::DEFAULT_MAX_CALL_DEPTH;

/// File name of the user-level config
pub const CONFIG_FILE: &str = "console.toml";

/// Complete console configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConsoleConfig {
    /// Prompt and line editing
    #[serde(default)]
    pub repl: ReplConfig,
    /// Evaluation limits
    #[serde(default)]
    pub eval: EvalConfig,
}

/// REPL configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplConfig {
    /// Prompt label, also the file name in backtraces
    #[serde(default = "default_label")]
    pub label: String,
    /// History file path
    #[serde(default)]
    pub history_file: Option<PathBuf>,
    /// History size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
    /// Use vi key bindings
    #[serde(default)]
    pub vi_mode: bool,
    /// Colorize results and errors
    #[serde(default = "default_colors")]
    pub colors: bool,
    /// Words that end the session
    #[serde(default = "default_exit_commands")]
    pub exit_commands: Vec<String>,
    /// Longest target description shown in the prompt
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_history_size() -> usize {
    1000
}

fn default_colors() -> bool {
    true
}

fn default_exit_commands() -> Vec<String> {
    DEFAULT_EXIT_COMMANDS.iter().map(|cmd| cmd.to_string()).collect()
}

fn default_description_limit() -> usize {
    DEFAULT_DESCRIPTION_LIMIT
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            history_file: None,
            history_size: default_history_size(),
            vi_mode: false,
            colors: default_colors(),
            exit_commands: default_exit_commands(),
            description_limit: default_description_limit(),
        }
    }
}

/// Evaluation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Nested call limit before `SystemStackError`
    #[serde(default = "default_max_call_depth")]
    pub max_call_depth: usize,
}

fn default_max_call_depth() -> usize {
    DEFAULT_MAX_CALL_DEPTH
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            max_call_depth: default_max_call_depth(),
        }
    }
}

/// Get the user config directory
pub fn get_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg_config).join("yaoxiang"));
    }

    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config").join("yaoxiang"));
    }

    if let Ok(appdata) = std::env::var("APPDATA") {
        return Some(PathBuf::from(appdata).join("yaoxiang"));
    }

    None
}

/// Get the user config file path (~/.config/yaoxiang/console.toml)
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE))
}

/// Default history file next to the user config
pub fn default_history_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join("console_history"))
}

/// Load the user-level config, or defaults when there is none
pub fn load_user_config() -> Result<ConsoleConfig, ConfigError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config(&path),
        _ => Ok(ConsoleConfig::default()),
    }
}

/// Load config from `path`
pub fn load_config(path: &Path) -> Result<ConsoleConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parse config from TOML text
pub fn parse_config(content: &str) -> Result<ConsoleConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Write `config` to `path`, creating parent directories
pub fn save_config(
    config: &ConsoleConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(io_error)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content).map_err(io_error)
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
