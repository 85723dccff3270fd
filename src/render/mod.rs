//! Presentation adapters over a [`DashboardView`].
//!
//! The pipeline is computed once per interaction; how the result is shown is
//! up to the [`Renderer`] in use.

mod json;
mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use crate::dashboard::DashboardView;
use crate::error::{AnalyticsError, Result};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// Turns a computed view into output.
pub trait Renderer {
    fn render(&self, view: &DashboardView, out: &mut dyn Write) -> Result<()>;

    /// Render into a `String`.
    fn render_to_string(&self, view: &DashboardView) -> Result<String> {
        let mut buffer = Vec::new();
        self.render(view, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| AnalyticsError::Render(e.to_string()))
    }
}

/// Available output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(AnalyticsError::InvalidParameter(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Renderer for `format`; `pretty` only affects JSON.
pub fn renderer_for(format: OutputFormat, pretty: bool) -> Box<dyn Renderer> {
    match format {
        OutputFormat::Text => Box::new(TextRenderer::new()),
        OutputFormat::Json => Box::new(JsonRenderer::new(pretty)),
    }
}

pub(crate) fn io_error(err: std::io::Error) -> AnalyticsError {
    AnalyticsError::Render(err.to_string())
}
