//! Query compilation: conditions, sorts and value transforms.
//!
//! ```text
//! ReportDefinition ──► ConditionBuilder ──► Vec<CompiledCondition> ─┐
//!                  └─► SortPlanner      ──► Vec<CompiledSort>      ─┴─► DataSource
//! ```

pub mod condition;
pub mod numeric;
pub mod sort;
pub mod transform;

pub use condition::{shape_value, CompiledCondition, ConditionBuilder, ConditionValue, Operator};
pub use sort::{CompiledSort, SortDirection, SortPlanner};
pub use transform::{
    NoParameters, ParameterSource, ParameterTransform, RelativeDateTransform, TransformChain,
    TransformContext, ValueTransform,
};
