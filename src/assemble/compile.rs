//! Definition → data-source request.
//!
//! ```text
//! ReportDefinition → headers → conditions → sort → QueryRequest
//! ```

use crate::model::ReportDefinition;
use crate::query::{ConditionBuilder, NoParameters, ParameterSource, SortPlanner, TransformChain};
use crate::registry::{FieldRegistry, SelectedField};
use crate::source::QueryRequest;

/// A compiled definition: the columns it produces and the request that
/// fetches them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledReport {
    pub selection: Vec<SelectedField>,
    pub request: QueryRequest,
    /// Position of the pagination field within the selection.
    pub paginate_column: Option<usize>,
}

/// Compiles definitions against one registry.
pub struct QueryCompiler<'a> {
    registry: &'a FieldRegistry,
    conditions: ConditionBuilder<'a>,
    sorts: SortPlanner<'a>,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self {
            registry,
            conditions: ConditionBuilder::new(registry),
            sorts: SortPlanner::new(registry),
        }
    }

    pub fn with_transforms(mut self, transforms: TransformChain) -> Self {
        self.conditions = ConditionBuilder::new(self.registry).with_transforms(transforms);
        self
    }

    pub fn registry(&self) -> &'a FieldRegistry {
        self.registry
    }

    /// Compile with no request parameters.
    pub fn compile_default(&self, definition: &ReportDefinition) -> CompiledReport {
        self.compile(definition, &NoParameters)
    }

    pub fn compile(
        &self,
        definition: &ReportDefinition,
        params: &dyn ParameterSource,
    ) -> CompiledReport {
        let selection = self.registry.selection(definition);
        let conditions = self.conditions.compile(definition, params);
        let sort = self.sorts.compile(definition);

        let paginate_by = match definition.paginate_by.as_deref() {
            Some(field) if self.registry.contains(field) => Some(self.registry.resolve(field)),
            Some(field) => {
                tracing::debug!(field, "ignoring pagination by unknown field");
                None
            }
            None => None,
        };
        let paginate_column = paginate_by
            .as_ref()
            .and_then(|p| selection.iter().position(|s| s.field == *p));

        let request = QueryRequest {
            record_set: self.registry.record_set().to_string(),
            fields: selection.iter().map(|s| s.field.clone()).collect(),
            conditions,
            sort,
            paginate_by,
        };
        tracing::debug!(
            fields = request.fields.len(),
            conditions = request.conditions.len(),
            sort = request.sort.len(),
            "compiled report query"
        );

        CompiledReport {
            selection,
            request,
            paginate_column,
        }
    }
}
