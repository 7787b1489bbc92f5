//! Config schema and deserialization

use crate::ReportConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root config structure for lantern.config.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Minimum overall score (exit 1 if any report is below)
    #[serde(default)]
    pub threshold: Option<f64>,

    /// HTML template path, relative to the config file
    #[serde(default)]
    pub template: Option<PathBuf>,

    /// Renderer script path, relative to the config file
    #[serde(default)]
    pub renderer: Option<PathBuf>,

    /// Category → audits mapping the report is built from
    #[serde(flatten)]
    pub report: ReportConfig,
}

impl Config {
    /// Resolve relative asset paths against the directory holding the config
    pub(crate) fn resolve_paths(&mut self, config_dir: &Path) {
        for path in [&mut self.template, &mut self.renderer].into_iter().flatten() {
            if path.is_relative() {
                *path = config_dir.join(&*path);
            }
        }
    }

    /// CLI flags take precedence over config values
    pub fn merge_with_cli(
        mut self,
        threshold: Option<f64>,
        template: Option<PathBuf>,
        renderer: Option<PathBuf>,
    ) -> Self {
        if threshold.is_some() {
            self.threshold = threshold;
        }
        if template.is_some() {
            self.template = template;
        }
        if renderer.is_some() {
            self.renderer = renderer;
        }
        self
    }
}
