//! Configuration module for Folio.
//!
//! Handles settings files, environment variables, and report files.

mod report_file;
mod settings;

pub use report_file::{ReportFile, TableReport};
pub use settings::{
    expand_env_vars, ConverterSettings, LogFormat, LoggingSettings, OutputSettings, Settings,
    SettingsError, SourceSettings,
};
