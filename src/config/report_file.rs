//! Report files: a table-backed report type plus a definition.
//!
//! ```toml
//! [report]
//! name = "Members"
//! table = "members"
//!
//! [[report.fields]]
//! name = "Region"
//!
//! [[report.fields]]
//! name = "Member.Name"
//! label = "Name"
//!
//! [definition]
//! title = "Members by region"
//! fields = ["Region", "Member.Name"]
//! sort_fields = ["Region"]
//! formats = ["html", "csv"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SettingsError;
use crate::model::ReportDefinition;
use crate::registry::{FieldSpec, ReportType};

/// A report type reading from one table or view.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableReport {
    pub name: String,
    pub table: String,
    pub fields: Vec<FieldSpec>,
}

impl ReportType for TableReport {
    fn report_name(&self) -> &str {
        &self.name
    }

    fn reportable_fields(&self) -> Vec<FieldSpec> {
        self.fields.clone()
    }

    fn data_objects(&self) -> &str {
        &self.table
    }
}

/// A report type and definition loaded together.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ReportFile {
    pub report: TableReport,
    #[serde(default)]
    pub definition: ReportDefinition,
}

impl ReportFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        let mut file: ReportFile = toml::from_str(content)?;
        if file.definition.title.trim().is_empty() {
            file.definition.title = file.report.name.clone();
        }
        Ok(file)
    }
}
