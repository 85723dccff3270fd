//! JSON presentation adapter.

use super::{io_error, Renderer};
use crate::dashboard::DashboardView;
use crate::error::{AnalyticsError, Result};
use std::io::Write;

/// Serialises the whole view; non-finite numbers become `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, view: &DashboardView, out: &mut dyn Write) -> Result<()> {
        let written = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, view)
        } else {
            serde_json::to_writer(&mut *out, view)
        };
        written.map_err(|e| AnalyticsError::Render(e.to_string()))?;
        writeln!(out).map_err(io_error)
    }
}
