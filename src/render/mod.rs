//! Rendering a report result into output formats.
//!
//! A [`RendererRegistry`] maps format tags to renderers. A format can also be
//! reached through a conversion route: render an intermediate format, then
//! pipe it through a [`Converter`]. The route for a tag is resolved with
//! [`RendererRegistry::route`].

mod convert;
mod csv;
mod html;
mod json;

pub use convert::{CommandConverter, ConvertError, Converter};
pub use csv::CsvRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::ReportResult;

/// Errors raised while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Render failed: {0}")]
    Failed(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Report-level facts available to every renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
    pub title: String,
    /// RFC 3339 timestamp of the generation run.
    pub generated_at: String,
    pub row_count: usize,
    /// Page heading template; `$name` is replaced by the page value.
    pub page_header: Option<String>,
}

impl RenderContext {
    /// Heading for a page with the given pagination value.
    pub fn page_heading(&self, label: &str) -> String {
        match &self.page_header {
            Some(template) => template.replace("$name", label),
            None => label.to_string(),
        }
    }
}

/// Everything a renderer receives.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub headers: &'a [String],
    pub result: &'a ReportResult,
    pub context: &'a RenderContext,
}

/// Renders a result into one output format.
pub trait Renderer {
    fn render(&self, input: &RenderInput<'_>) -> RenderResult<Vec<u8>>;
}

struct Conversion {
    via: String,
    converter: Box<dyn Converter>,
}

/// How a requested format will be produced.
pub enum Route<'a> {
    /// A renderer registered for the format itself.
    Direct(&'a dyn Renderer),
    /// Render `via`, then convert to the requested format.
    Convert {
        via: &'a str,
        renderer: &'a dyn Renderer,
        converter: &'a dyn Converter,
    },
    /// Nothing can produce the format.
    Missing,
}

/// Registered renderers and conversion routes, keyed by format tag.
#[derive(Default)]
pub struct RendererRegistry {
    renderers: BTreeMap<String, Box<dyn Renderer>>,
    conversions: BTreeMap<String, Conversion>,
}

impl RendererRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `html`, `csv` and `json` renderers.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("html", HtmlRenderer);
        registry.register("csv", CsvRenderer);
        registry.register("json", JsonRenderer);
        registry
    }

    pub fn register(&mut self, format: &str, renderer: impl Renderer + 'static) -> &mut Self {
        self.renderers
            .insert(format.to_ascii_lowercase(), Box::new(renderer));
        self
    }

    /// Produce `target` by rendering `via` and converting the result.
    ///
    /// A conversion route takes precedence over a renderer registered for
    /// `target` itself.
    pub fn register_conversion(
        &mut self,
        target: &str,
        via: &str,
        converter: Box<dyn Converter>,
    ) -> &mut Self {
        self.conversions.insert(
            target.to_ascii_lowercase(),
            Conversion {
                via: via.to_ascii_lowercase(),
                converter,
            },
        );
        self
    }

    pub fn route(&self, format: &str) -> Route<'_> {
        let format = format.to_ascii_lowercase();
        if let Some(conversion) = self.conversions.get(&format) {
            return match self.renderers.get(&conversion.via) {
                Some(renderer) => Route::Convert {
                    via: &conversion.via,
                    renderer: renderer.as_ref(),
                    converter: conversion.converter.as_ref(),
                },
                None => Route::Missing,
            };
        }
        match self.renderers.get(&format) {
            Some(renderer) => Route::Direct(renderer.as_ref()),
            None => Route::Missing,
        }
    }

    pub fn supports(&self, format: &str) -> bool {
        !matches!(self.route(format), Route::Missing)
    }

    /// Every format tag that can be produced, sorted.
    pub fn formats(&self) -> Vec<String> {
        let mut formats: Vec<String> = self
            .renderers
            .keys()
            .chain(self.conversions.keys())
            .filter(|f| self.supports(f))
            .cloned()
            .collect();
        formats.sort();
        formats.dedup();
        formats
    }

    /// The intermediate format for a converted target.
    pub fn conversion_via(&self, format: &str) -> Option<&str> {
        self.conversions
            .get(&format.to_ascii_lowercase())
            .map(|c| c.via.as_str())
    }
}
