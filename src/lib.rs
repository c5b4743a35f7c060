//! # Folio
//!
//! Configurable tabular reports, compiled to safe queries and rendered to
//! multiple output formats.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              ReportDefinition (user-authored)            │
//! │  (fields, headers, conditions, sort, totals, formats)    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [registry + query]
//! ┌─────────────────────────────────────────────────────────┐
//! │  Headers, CompiledCondition, CompiledSort → QueryRequest │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [source: memory, sqlite via sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │                    ReportResult                          │
//! │          + postprocess (derive, blank, totals)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render + store]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 GeneratedArtifact                        │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`assemble::ReportAssembler`] drives the whole pipeline.

pub mod assemble;
pub mod config;
pub mod model;
pub mod postprocess;
pub mod query;
pub mod registry;
pub mod render;
pub mod source;
pub mod sql;
pub mod store;
pub mod telemetry;

pub use assemble::{BatchReport, FormatOutcome, GenerateError, ReportAssembler};
pub use model::{GeneratedArtifact, ReportDefinition, ReportResult, Value};
pub use registry::{FieldRegistry, ReportType};
