//! JSON reporter for machine-readable output

use crate::error::Result;
use crate::Report;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a single report as JSON
    pub fn report(&self, report: &Report) -> Result<String> {
        self.to_string(report)
    }

    /// Report multiple reports as a JSON array
    pub fn report_many(&self, reports: &[Report]) -> Result<String> {
        self.to_string(reports)
    }

    fn to_string<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}
