//! CSV renderer.

use ::csv::{Terminator, WriterBuilder};

use super::{RenderError, RenderInput, RenderResult, Renderer};
use crate::model::Row;

/// Renders headers, body and totals as RFC 4180 CSV.
///
/// Pagination is flattened: pages are contiguous in the body already.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

impl Renderer for CsvRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderResult<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .flexible(true)
            .from_writer(Vec::new());

        writer.write_record(input.headers)?;
        for row in &input.result.rows {
            writer.write_record(displays(row))?;
        }
        if let Some(totals) = &input.result.totals {
            writer.write_record(displays(totals))?;
        }

        writer
            .into_inner()
            .map_err(|e| RenderError::Failed(e.to_string()))
    }
}

fn displays(row: &Row) -> impl Iterator<Item = &str> {
    row.cells.iter().map(|c| c.display.as_str())
}
