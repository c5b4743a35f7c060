//! Report assembly: definition in, artifact out.
//!
//! ```text
//! ReportDefinition
//!       │
//!       ▼ [QueryCompiler]      headers, conditions, sort
//! QueryRequest
//!       │
//!       ▼ [DataSource]         raw rows
//! ReportResult
//!       │
//!       ▼ [PostProcessor]      derive → blank → totals
//!       │
//!       ▼ [RendererRegistry]   render, or render + convert
//! GeneratedArtifact            inline, or persisted via ArtifactStore
//! ```
//!
//! Each call owns its result and discards it once rendered. There is no
//! shared state between calls and no locking.

mod compile;

pub use compile::{CompiledReport, QueryCompiler};

use sha2::{Digest, Sha256};

use crate::model::{
    ArtifactContent, GeneratedArtifact, ReportDefinition, ReportResult, Row, Value,
};
use crate::postprocess::{PostProcessor, RowDeriver, RowSum};
use crate::query::{NoParameters, ParameterSource, TransformChain};
use crate::registry::FieldRegistry;
use crate::render::{
    ConvertError, RenderContext, RenderError, RenderInput, Renderer, RendererRegistry, Route,
};
use crate::source::{DataSource, SourceError};
use crate::store::{sanitize_file_name, sanitize_stem, ArtifactStore, StoreError};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that abort one generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Persisting was requested but no artifact store is configured")]
    NoStore,
}

pub type GenerateResult<T> = Result<T, GenerateError>;

// ============================================================================
// Batch Outcomes
// ============================================================================

/// The outcome of generating one format in a batch.
#[derive(Debug)]
pub struct FormatOutcome {
    pub format: String,
    pub result: GenerateResult<GeneratedArtifact>,
}

/// Per-format outcomes of [`ReportAssembler::generate_all`], in request order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FormatOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> Vec<&GeneratedArtifact> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }

    pub fn failed(&self) -> Vec<(&str, &GenerateError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.format.as_str(), e)))
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }
}

/// Content used when no renderer can produce a format.
pub fn placeholder_content(format: &str) -> String {
    format!("No renderer registered for format '{}'", format)
}

/// Lowercase hex SHA-256 of rendered content.
pub fn checksum(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}

// ============================================================================
// Assembler
// ============================================================================

/// Orchestrates compilation, fetching, post-processing and rendering.
pub struct ReportAssembler<'a> {
    compiler: QueryCompiler<'a>,
    source: &'a dyn DataSource,
    renderers: &'a RendererRegistry,
    store: Option<&'a dyn ArtifactStore>,
    params: &'a dyn ParameterSource,
    deriver: Box<dyn RowDeriver + 'a>,
}

impl<'a> ReportAssembler<'a> {
    pub fn new(
        registry: &'a FieldRegistry,
        source: &'a dyn DataSource,
        renderers: &'a RendererRegistry,
    ) -> Self {
        Self {
            compiler: QueryCompiler::new(registry),
            source,
            renderers,
            store: None,
            params: &NoParameters,
            deriver: Box::new(RowSum),
        }
    }

    pub fn with_store(mut self, store: &'a dyn ArtifactStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Request parameters, consulted by `param:` values before defaults.
    pub fn with_parameters(mut self, params: &'a dyn ParameterSource) -> Self {
        self.params = params;
        self
    }

    pub fn with_transforms(mut self, transforms: TransformChain) -> Self {
        self.compiler = self.compiler.with_transforms(transforms);
        self
    }

    pub fn with_deriver(mut self, deriver: impl RowDeriver + 'a) -> Self {
        self.deriver = Box::new(deriver);
        self
    }

    pub fn compiler(&self) -> &QueryCompiler<'a> {
        &self.compiler
    }

    /// Compile, fetch and post-process a definition.
    pub fn build_result(&self, definition: &ReportDefinition) -> GenerateResult<ReportResult> {
        let compiled = self.compiler.compile(definition, self.params);
        let columns: Vec<_> = compiled.selection.iter().map(|s| s.column.clone()).collect();
        if columns.is_empty() {
            tracing::debug!("definition selects no fields");
            return Ok(ReportResult::new(columns, Vec::new()));
        }

        let width = columns.len();
        let rows = self
            .source
            .execute(&compiled.request)?
            .into_iter()
            .map(|mut values| {
                values.resize(width, Value::Null);
                Row::from_values(values)
            })
            .collect();

        let mut result = ReportResult::new(columns, rows);
        result.paginate_by = compiled.paginate_column;
        PostProcessor::new(definition, &compiled.selection, self.deriver.as_ref())
            .run(&mut result);
        Ok(result)
    }

    /// Generate one artifact.
    ///
    /// A format nothing can produce yields a placeholder artifact rather than
    /// an error. Persisting requires a store; any store failure is fatal.
    pub fn generate(
        &self,
        definition: &ReportDefinition,
        format: &str,
        persist: bool,
    ) -> GenerateResult<GeneratedArtifact> {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("generate", report = %definition.title, format, %run_id);
        let _guard = span.enter();

        let store = match (persist, self.store) {
            (true, Some(store)) => Some(store),
            (true, None) => return Err(GenerateError::NoStore),
            (false, _) => None,
        };

        let content = match self.renderers.route(format) {
            Route::Direct(renderer) => {
                let result = self.build_result(definition)?;
                render_with(renderer, definition, &result)?
            }
            Route::Convert {
                via,
                renderer,
                converter,
            } => {
                let result = self.build_result(definition)?;
                let intermediate = render_with(renderer, definition, &result)?;
                tracing::debug!(via, bytes = intermediate.len(), "converting rendered content");
                converter.convert(&intermediate, format)?
            }
            Route::Missing => {
                tracing::warn!("no renderer registered, emitting placeholder");
                placeholder_content(format).into_bytes()
            }
        };

        let name = sanitize_file_name(&definition.title, format);
        let checksum = checksum(&content);
        let content = match store {
            Some(store) => {
                let folder = store.find_or_make(&sanitize_stem(&definition.title))?;
                ArtifactContent::Stored(store.persist(&folder, &content, &name)?)
            }
            None => ArtifactContent::Inline(content),
        };

        tracing::info!(name = %name, "generated artifact");
        Ok(GeneratedArtifact {
            format: format.to_string(),
            name,
            content,
            checksum,
        })
    }

    /// Generate every enabled format independently, in order.
    ///
    /// A failing format is recorded and the batch moves on.
    pub fn generate_all(&self, definition: &ReportDefinition, persist: bool) -> BatchReport {
        let outcomes = definition
            .formats
            .iter()
            .map(|format| {
                let result = self.generate(definition, format, persist);
                if let Err(e) = &result {
                    tracing::warn!(report = %definition.title, format = %format, error = %e, "format failed");
                }
                FormatOutcome {
                    format: format.clone(),
                    result,
                }
            })
            .collect();
        BatchReport { outcomes }
    }
}

fn render_with(
    renderer: &dyn Renderer,
    definition: &ReportDefinition,
    result: &ReportResult,
) -> GenerateResult<Vec<u8>> {
    let context = RenderContext {
        title: definition.title.clone(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        row_count: result.rows.len(),
        page_header: definition.page_header.clone(),
    };
    let headers: Vec<String> = result.headers().into_iter().map(String::from).collect();
    let input = RenderInput {
        headers: &headers,
        result,
        context: &context,
    };
    Ok(renderer.render(&input)?)
}
