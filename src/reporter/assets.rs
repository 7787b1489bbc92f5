//! Template and renderer text for the HTML reporter

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const BUILTIN_TEMPLATE: &str = include_str!("../../assets/report-template.html");
const BUILTIN_RENDERER: &str = include_str!("../../assets/report-renderer.js");

/// The two text blobs an HTML report is assembled from.
///
/// Loaded once up front and handed to [`super::HtmlReporter`]; nothing here
/// is re-read per report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportAssets {
    pub template: String,
    pub renderer: String,
}

impl ReportAssets {
    /// Assets compiled into the binary
    pub fn builtin() -> Self {
        Self {
            template: BUILTIN_TEMPLATE.to_string(),
            renderer: BUILTIN_RENDERER.to_string(),
        }
    }

    /// Load assets from disk, falling back to the built-in ones per file
    pub fn load(template: Option<&Path>, renderer: Option<&Path>) -> Result<Self> {
        let template = match template {
            Some(path) => read_asset(path, "template")?,
            None => BUILTIN_TEMPLATE.to_string(),
        };
        let renderer = match renderer {
            Some(path) => read_asset(path, "renderer")?,
            None => BUILTIN_RENDERER.to_string(),
        };
        Ok(Self { template, renderer })
    }
}

impl Default for ReportAssets {
    fn default() -> Self {
        Self::builtin()
    }
}

fn read_asset(path: &Path, kind: &str) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read report {}: {}", kind, path.display()))
}
