//! HTML table renderer.

use std::fmt::Write;

use super::{RenderInput, RenderResult, Renderer};
use crate::model::Row;

/// Renders a standalone HTML document with one table per page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderResult<Vec<u8>> {
        let ctx = input.context;
        let mut html = String::new();

        writeln!(html, "<!DOCTYPE html>")?;
        writeln!(html, "<html>")?;
        writeln!(html, "<head>")?;
        writeln!(html, "<meta charset=\"utf-8\">")?;
        writeln!(html, "<title>{}</title>", escape(&ctx.title))?;
        writeln!(html, "</head>")?;
        writeln!(html, "<body>")?;
        writeln!(html, "<h1>{}</h1>", escape(&ctx.title))?;

        let pages = input.result.pages();
        let last = pages.len().saturating_sub(1);
        for (i, page) in pages.iter().enumerate() {
            if let Some(label) = &page.label {
                writeln!(html, "<h2>{}</h2>", escape(&ctx.page_heading(label)))?;
            }
            writeln!(html, "<table>")?;
            writeln!(html, "<thead>")?;
            write!(html, "<tr>")?;
            for header in input.headers {
                write!(html, "<th>{}</th>", escape(header))?;
            }
            writeln!(html, "</tr>")?;
            writeln!(html, "</thead>")?;
            writeln!(html, "<tbody>")?;
            for row in page.rows {
                write_row(&mut html, row)?;
            }
            writeln!(html, "</tbody>")?;
            if i == last {
                if let Some(totals) = &input.result.totals {
                    writeln!(html, "<tfoot>")?;
                    write_row(&mut html, totals)?;
                    writeln!(html, "</tfoot>")?;
                }
            }
            writeln!(html, "</table>")?;
        }

        writeln!(
            html,
            "<p class=\"generated\">{} rows, generated {}</p>",
            ctx.row_count,
            escape(&ctx.generated_at)
        )?;
        writeln!(html, "</body>")?;
        writeln!(html, "</html>")?;

        Ok(html.into_bytes())
    }
}

fn write_row(html: &mut String, row: &Row) -> std::fmt::Result {
    write!(html, "<tr>")?;
    for cell in &row.cells {
        write!(html, "<td>{}</td>", escape(&cell.display))?;
    }
    writeln!(html, "</tr>")
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
