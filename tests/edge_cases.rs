//! Edge case tests: degenerate inputs must not panic.

use lantern::reporter::HtmlReporter;
use lantern::{
    build_report, weighted_mean, AuditDefinition, AuditResult, Categories, CategoryDefinition,
    ReportConfig, ScoreValue, ScoredItem,
};
use serde_json::json;
use std::collections::HashMap;

fn one_audit_config(weight: ScoreValue) -> ReportConfig {
    let mut categories = Categories::new();
    categories.insert(
        "only",
        CategoryDefinition::new()
            .with_weight(weight.clone())
            .with_audit(AuditDefinition::new("a").with_weight(weight)),
    );
    ReportConfig { categories }
}

fn results_with(score: ScoreValue) -> HashMap<String, AuditResult> {
    HashMap::from([("a".to_string(), AuditResult::new(score))])
}

#[test]
fn empty_config_scores_zero() {
    let report = build_report(&ReportConfig::default(), &HashMap::new()).unwrap();
    assert_eq!(report.score, 0.0);
    assert!(report.categories.is_empty());
    assert_eq!(
        serde_json::to_string(&report).unwrap(),
        r#"{"score":0,"categories":[]}"#
    );
}

#[test]
fn extra_results_are_ignored() {
    let config = one_audit_config(ScoreValue::from(1));
    let mut results = results_with(ScoreValue::from(70));
    results.insert("unused".into(), AuditResult::new(5));
    let report = build_report(&config, &results).unwrap();
    assert_eq!(report.score, 70.0);
    assert_eq!(report.audit_count(), 1);
}

#[test]
fn category_without_audits_scores_zero() {
    let mut categories = Categories::new();
    categories.insert("empty", CategoryDefinition::new().with_weight(1));
    categories.insert(
        "full",
        CategoryDefinition::new()
            .with_weight(1)
            .with_audit(AuditDefinition::new("a").with_weight(1)),
    );
    let report = build_report(&ReportConfig { categories }, &results_with(ScoreValue::from(100))).unwrap();
    assert_eq!(report.categories[0].score, 0.0);
    assert_eq!(report.score, 50.0);
}

#[test]
fn zero_weights_everywhere_score_zero() {
    let config = one_audit_config(ScoreValue::from(0));
    let report = build_report(&config, &results_with(ScoreValue::from(100))).unwrap();
    assert_eq!(report.categories[0].score, 0.0);
    assert_eq!(report.score, 0.0);
}

#[test]
fn quoted_weights_are_parsed() {
    let config: ReportConfig = serde_json::from_value(json!({
        "categories": {
            "c": {"weight": "2", "audits": [
                {"id": "a", "weight": " 3 "},
                {"id": "b", "weight": "one"}
            ]}
        }
    }))
    .unwrap();
    let results: HashMap<String, AuditResult> = serde_json::from_value(json!({
        "a": {"score": 60},
        "b": {"score": 100}
    }))
    .unwrap();
    let report = build_report(&config, &results).unwrap();
    assert_eq!(report.categories[0].score, 60.0);
    assert_eq!(report.score, 60.0);
}

#[test]
fn non_numeric_scores_count_as_zero() {
    for score in [
        ScoreValue::Null,
        ScoreValue::from("n/a"),
        ScoreValue::from(json!({"value": 90})),
        ScoreValue::from(json!([90])),
    ] {
        let report = build_report(&one_audit_config(ScoreValue::from(1)), &results_with(score)).unwrap();
        assert_eq!(report.score, 0.0);
    }
}

#[test]
fn negative_and_oversized_scores_pass_through() {
    let report = build_report(
        &one_audit_config(ScoreValue::from(1)),
        &results_with(ScoreValue::from(250)),
    )
    .unwrap();
    assert_eq!(report.score, 250.0);

    let negative = weighted_mean([ScoredItem::new(-10, 1), ScoredItem::new(30, 1)]);
    assert_eq!(negative, 10.0);
}

#[test]
fn huge_weights_stay_finite() {
    let mean = weighted_mean([ScoredItem::new(50, 1e308), ScoredItem::new(50, 1e308)]);
    assert!(mean.is_finite());
}

#[test]
fn empty_mean_is_zero() {
    assert_eq!(weighted_mean(Vec::<ScoredItem>::new()), 0.0);
}

#[test]
fn unicode_and_markup_in_ids_survive_html() {
    let mut categories = Categories::new();
    categories.insert(
        "<b>café</b>",
        CategoryDefinition::new()
            .with_weight(1)
            .with_field("name", "Zugänglichkeit </script>")
            .with_audit(AuditDefinition::new("a").with_weight(1)),
    );
    let report = build_report(&ReportConfig { categories }, &results_with(ScoreValue::from(80))).unwrap();
    let html = HtmlReporter::new("%%LIGHTHOUSE_JSON%%", "").report(&report).unwrap();
    assert!(!html.contains('<'));
    let decoded: serde_json::Value = serde_json::from_str(&html).unwrap();
    assert_eq!(decoded["categories"][0]["id"], "<b>café</b>");
    assert_eq!(decoded["categories"][0]["name"], "Zugänglichkeit </script>");
}

#[test]
fn template_with_only_text_is_returned_verbatim() {
    let reporter = HtmlReporter::new("", "ignored");
    assert_eq!(reporter.report(&json!({"score": 1})).unwrap(), "");
    assert_eq!(reporter.missing_placeholders().len(), 2);
}

#[test]
fn percent_signs_near_placeholders_are_literal() {
    let reporter = HtmlReporter::new("%%%LIGHTHOUSE_JSON%%%", "");
    assert_eq!(reporter.report(&json!(1)).unwrap(), "%1%");
}

#[test]
fn infinite_audit_score_zeroes_its_category() {
    let mut categories = Categories::new();
    categories.insert(
        "broken",
        CategoryDefinition::new()
            .with_weight(1)
            .with_audit(AuditDefinition::new("a").with_weight(1))
            .with_audit(AuditDefinition::new("b").with_weight(1)),
    );
    categories.insert(
        "fine",
        CategoryDefinition::new()
            .with_weight(1)
            .with_audit(AuditDefinition::new("c").with_weight(1)),
    );
    let results = HashMap::from([
        ("a".to_string(), AuditResult::new("Infinity")),
        ("b".to_string(), AuditResult::new(50)),
        ("c".to_string(), AuditResult::new(80)),
    ]);
    let report = build_report(&ReportConfig { categories }, &results).unwrap();
    assert_eq!(report.categories[0].audits[0].score, f64::INFINITY);
    assert_eq!(report.categories[0].score, 0.0);
    assert_eq!(report.score, 40.0);
}
