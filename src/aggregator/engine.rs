//! Report building: resolve audit results and roll scores up the tree

use super::scoring::weighted_mean;
use crate::error::{ReportError, Result};
use crate::{
    AuditDefinition, AuditEntry, AuditResult, CategoryDefinition, CategoryReport, Report,
    ReportConfig,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Build the report tree from a category config and the runner's results.
///
/// Every audit named by the config must have an entry in `results`; a gap is
/// a config/runner mismatch and fails with [`ReportError::MissingResult`]
/// rather than scoring the audit as 0.
pub fn build_report(
    config: &ReportConfig,
    results: &HashMap<String, AuditResult>,
) -> Result<Report> {
    let categories = config
        .categories
        .iter()
        .map(|(id, category)| build_category(id, category, results))
        .collect::<Result<Vec<_>>>()?;

    let score = weighted_mean(&categories);
    Ok(Report { score, categories })
}

fn build_category(
    id: &str,
    category: &CategoryDefinition,
    results: &HashMap<String, AuditResult>,
) -> Result<CategoryReport> {
    let audits = category
        .audits
        .iter()
        .map(|audit| {
            let result = results
                .get(&audit.id)
                .ok_or_else(|| ReportError::MissingResult {
                    category: id.to_string(),
                    audit: audit.id.clone(),
                })?;
            Ok(resolve_audit(audit, result))
        })
        .collect::<Result<Vec<_>>>()?;

    let score = weighted_mean(&audits);
    Ok(CategoryReport {
        id: id.to_string(),
        weight: category.weight.clone(),
        extra: without_keys(&category.extra, &["id", "audits", "score"]),
        audits,
        score,
    })
}

fn resolve_audit(audit: &AuditDefinition, result: &AuditResult) -> AuditEntry {
    AuditEntry {
        id: audit.id.clone(),
        weight: audit.weight.clone(),
        extra: without_keys(&audit.extra, &["result", "score"]),
        result: result.clone(),
        score: result.audit_score(),
    }
}

/// Copy of `fields` minus the keys the composed record sets itself
fn without_keys(fields: &Map<String, Value>, reserved: &[&str]) -> Map<String, Value> {
    fields
        .iter()
        .filter(|(key, _)| !reserved.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Aggregate statistics over several reports
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregateStats {
    /// Number of reports
    pub reports: usize,
    /// Mean overall score (unweighted across reports)
    pub average_score: f64,
    /// Categories across all reports
    pub total_categories: usize,
    /// Audit entries across all reports
    pub total_audits: usize,
}

/// Get aggregate stats from multiple reports
pub fn aggregate_stats(reports: &[Report]) -> AggregateStats {
    if reports.is_empty() {
        return AggregateStats::default();
    }

    let total_score: f64 = reports.iter().map(|r| r.score).sum();

    AggregateStats {
        reports: reports.len(),
        average_score: total_score / reports.len() as f64,
        total_categories: reports.iter().map(|r| r.categories.len()).sum(),
        total_audits: reports.iter().map(Report::audit_count).sum(),
    }
}
