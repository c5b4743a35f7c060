//! Report data model: definitions, values, results and artifacts.

pub mod definition;
pub mod result;
pub mod value;

pub use definition::ReportDefinition;
pub use result::{ArtifactContent, Cell, Column, GeneratedArtifact, Page, ReportResult, Row};
pub use value::{format_number, Value};
