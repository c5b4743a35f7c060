//! JSON renderer.

use serde::Serialize;

use super::{RenderContext, RenderInput, RenderResult, Renderer};
use crate::model::{Row, Value};

/// Renders the result as a JSON document.
///
/// Rows carry both the display text and the underlying values, so blanked
/// duplicates stay recoverable for machine consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct Document<'a> {
    #[serde(flatten)]
    context: &'a RenderContext,
    headers: &'a [String],
    pages: Vec<JsonPage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Vec<String>>,
}

#[derive(Serialize)]
struct JsonPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    heading: Option<String>,
    rows: Vec<Vec<String>>,
    values: Vec<Vec<Value>>,
}

fn displays(row: &Row) -> Vec<String> {
    row.cells.iter().map(|c| c.display.clone()).collect()
}

impl Renderer for JsonRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderResult<Vec<u8>> {
        let pages = input
            .result
            .pages()
            .into_iter()
            .map(|page| JsonPage {
                heading: page.label.map(|l| input.context.page_heading(&l)),
                rows: page.rows.iter().map(displays).collect(),
                values: page
                    .rows
                    .iter()
                    .map(|r| r.cells.iter().map(|c| c.value.clone()).collect())
                    .collect(),
            })
            .collect();

        let doc = Document {
            context: input.context,
            headers: input.headers,
            pages,
            totals: input.result.totals.as_ref().map(displays),
        };
        Ok(serde_json::to_vec_pretty(&doc)?)
    }
}
