//! TOML-based configuration for Folio.
//!
//! Supports a config file (folio.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [output]
//! directory = "${HOME}/reports"
//! persist = true
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [source]
//! sqlite = "./data/members.db"
//! dialect = "sqlite"
//!
//! [[converters]]
//! format = "pdf"
//! via = "html"
//! command = "wkhtmltopdf"
//! args = ["-q", "-", "-"]
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::render::{CommandConverter, RendererRegistry};
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where generated artifacts go.
    pub output: OutputSettings,

    /// Log level and format.
    pub logging: LoggingSettings,

    /// Where report rows come from.
    pub source: SourceSettings,

    /// External conversion routes.
    pub converters: Vec<ConverterSettings>,
}

/// Artifact output configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Artifact store root (supports ${ENV_VAR} expansion).
    pub directory: Option<String>,

    /// Persist artifacts instead of writing them to stdout.
    pub persist: bool,
}

impl OutputSettings {
    /// The store root, defaulting to `<data dir>/folio/reports`.
    pub fn resolved_directory(&self) -> Result<PathBuf, SettingsError> {
        match &self.directory {
            Some(dir) => Ok(PathBuf::from(expand_env_vars(dir)?)),
            None => dirs::data_dir()
                .map(|d| d.join("folio").join("reports"))
                .ok_or_else(|| {
                    SettingsError::InvalidConfig("no data directory for output".into())
                }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `folio=debug`.
    pub level: String,

    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Data source configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceSettings {
    /// SQLite database path (supports ${ENV_VAR} expansion).
    pub sqlite: Option<String>,

    /// SQL dialect for printed queries.
    pub dialect: Option<String>,
}

impl SourceSettings {
    pub fn resolved_sqlite_path(&self) -> Result<Option<PathBuf>, SettingsError> {
        self.sqlite
            .as_deref()
            .map(|p| expand_env_vars(p).map(PathBuf::from))
            .transpose()
    }

    pub fn dialect(&self) -> Result<Dialect, SettingsError> {
        match &self.dialect {
            Some(d) => d.parse().map_err(SettingsError::InvalidConfig),
            None => Ok(Dialect::default()),
        }
    }
}

/// One conversion route: render `via`, pipe it through `command`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConverterSettings {
    /// Target format tag.
    pub format: String,

    /// Intermediate format the command reads.
    pub via: String,

    /// Program to run (supports ${ENV_VAR} expansion).
    pub command: String,

    /// Arguments; `{format}` is replaced by the target format.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FOLIO_CONFIG`
    /// 2. `./folio.toml`
    /// 3. `~/.config/folio/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FOLIO_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("folio.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("folio").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Register every configured conversion route.
    pub fn register_converters(&self, registry: &mut RendererRegistry) -> Result<(), SettingsError> {
        for conv in &self.converters {
            if conv.format.trim().is_empty() || conv.via.trim().is_empty() {
                return Err(SettingsError::InvalidConfig(format!(
                    "converter '{}' needs both format and via",
                    conv.command
                )));
            }
            let command = expand_env_vars(&conv.command)?;
            registry.register_conversion(
                &conv.format,
                &conv.via,
                Box::new(CommandConverter::new(&command).with_args(conv.args.iter().cloned())),
            );
        }
        Ok(())
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let var_name: String = if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            chars.by_ref().take_while(|&ch| ch != '}').collect()
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            let mut name = String::new();
            while let Some(ch) = chars.next_if(|ch| ch.is_alphanumeric() || *ch == '_') {
                name.push(ch);
            }
            if name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
            name
        };

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
