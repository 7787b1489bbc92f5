//! Lantern: audit score roll-up and self-contained HTML reports
//!
//! This library folds independently computed audit results into a report tree
//! (audits → categories → overall score, by weighted arithmetic mean) and embeds
//! that report into an HTML template without letting the payload escape its
//! `<script>` context.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod reporter;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub use aggregator::{build_report, weighted_mean, Scored, ScoredItem};
pub use reporter::render_html;
pub use error::{ReportError, Result};

/// Largest integer a JavaScript number represents exactly (2^53 - 1)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A loosely typed score or weight as produced by an audit runner or config file.
///
/// Audit runners report `true`/`false` for pass/fail audits, numbers for graded
/// audits, and `null` when the audit itself errored. Config authors sometimes
/// quote numbers. Every shape is accepted and normalized on read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    #[default]
    Null,
    /// Arrays, objects, anything else: never numeric
    Other(Value),
}

impl ScoreValue {
    /// Normalize to a number.
    ///
    /// Numbers pass through, numeric text is parsed after trimming, everything
    /// else (booleans included) is 0. NaN is 0; infinities are kept and left
    /// for the mean's quotient check.
    pub fn as_number(&self) -> f64 {
        let value = match self {
            ScoreValue::Number(n) => n.as_f64().unwrap_or(0.0),
            ScoreValue::Text(s) => parse_numeric_text(s),
            ScoreValue::Bool(_) | ScoreValue::Null | ScoreValue::Other(_) => 0.0,
        };
        nan_to_zero(value)
    }

    /// Normalize an audit result score: pass/fail booleans map to 100/0,
    /// everything else goes through [`ScoreValue::as_number`].
    pub fn as_audit_score(&self) -> f64 {
        match self {
            ScoreValue::Bool(true) => 100.0,
            ScoreValue::Bool(false) => 0.0,
            other => other.as_number(),
        }
    }
}

/// Numeric text as a browser reads it: decimal with optional sign and
/// exponent, `Infinity`, or an unsigned `0x`/`0o`/`0b` literal. Anything
/// else is NaN.
fn parse_numeric_text(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix_digits(&trimmed[2..], radix);
    }

    // f64::from_str also takes "inf" and "nan" spellings
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix_digits(digits: &str, radix: u32) -> f64 {
    if digits.is_empty() {
        return f64::NAN;
    }
    digits
        .chars()
        .try_fold(0.0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

pub(crate) fn nan_to_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl From<f64> for ScoreValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(ScoreValue::Number)
            .unwrap_or(ScoreValue::Null)
    }
}

impl From<i64> for ScoreValue {
    fn from(value: i64) -> Self {
        ScoreValue::Number(value.into())
    }
}

impl From<i32> for ScoreValue {
    fn from(value: i32) -> Self {
        ScoreValue::Number(value.into())
    }
}

impl From<bool> for ScoreValue {
    fn from(value: bool) -> Self {
        ScoreValue::Bool(value)
    }
}

impl From<&str> for ScoreValue {
    fn from(value: &str) -> Self {
        ScoreValue::Text(value.to_string())
    }
}

impl From<String> for ScoreValue {
    fn from(value: String) -> Self {
        ScoreValue::Text(value)
    }
}

impl From<Value> for ScoreValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => ScoreValue::Bool(b),
            Value::Number(n) => ScoreValue::Number(n),
            Value::String(s) => ScoreValue::Text(s),
            Value::Null => ScoreValue::Null,
            other => ScoreValue::Other(other),
        }
    }
}

/// Keeps an explicit `null` distinct from an absent field.
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<ScoreValue>, D::Error>
where
    D: Deserializer<'de>,
{
    ScoreValue::deserialize(deserializer).map(Some)
}

/// Writes a computed score the way a JavaScript engine prints numbers:
/// integral values carry no fractional part.
fn serialize_score<S>(score: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if score.fract() == 0.0 && score.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*score as i64)
    } else {
        serializer.serialize_f64(*score)
    }
}

/// Static metadata for one audit inside a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditDefinition {
    /// Stable audit identifier, the key into the results mapping
    pub id: String,
    /// Weight within the category (missing counts as 0)
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<ScoreValue>,
    /// Descriptive fields carried through to the report untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuditDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            weight: None,
            extra: Map::new(),
        }
    }

    pub fn with_weight(mut self, weight: impl Into<ScoreValue>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Output of the audit runner for one audit
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditResult {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<ScoreValue>,
    /// Everything else the runner reported (display values, details, errors)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuditResult {
    pub fn new(score: impl Into<ScoreValue>) -> Self {
        Self {
            score: Some(score.into()),
            extra: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Normalized score of this result (0 when the runner reported none)
    pub fn audit_score(&self) -> f64 {
        self.score.as_ref().map_or(0.0, ScoreValue::as_audit_score)
    }
}

/// A named, weighted group of audits
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// Weight in the overall score (missing counts as 0)
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<ScoreValue>,
    /// Audits in display order
    #[serde(default)]
    pub audits: Vec<AuditDefinition>,
    /// Name, description and any other descriptive fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, weight: impl Into<ScoreValue>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_audit(mut self, audit: AuditDefinition) -> Self {
        self.audits.push(audit);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Category id → definition, in document order.
///
/// JSON objects are unordered in serde_json's default map, so the order is
/// kept explicitly: categories render in the order the config lists them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Categories(Vec<(String, CategoryDefinition)>);

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category. A replaced category keeps its position.
    pub fn insert(&mut self, id: impl Into<String>, category: CategoryDefinition) {
        let id = id.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = category,
            None => self.0.push((id, category)),
        }
    }

    pub fn get(&self, id: &str) -> Option<&CategoryDefinition> {
        self.0
            .iter()
            .find(|(existing, _)| existing == id)
            .map(|(_, category)| category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryDefinition)> {
        self.0.iter().map(|(id, category)| (id.as_str(), category))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Categories {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, category) in &self.0 {
            map.serialize_entry(id, category)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category id to category definition")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Categories, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut categories = Categories::new();
                while let Some((id, category)) =
                    access.next_entry::<String, CategoryDefinition>()?
                {
                    categories.insert(id, category);
                }
                Ok(categories)
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

impl FromIterator<(String, CategoryDefinition)> for Categories {
    fn from_iter<I: IntoIterator<Item = (String, CategoryDefinition)>>(iter: I) -> Self {
        let mut categories = Categories::new();
        for (id, category) in iter {
            categories.insert(id, category);
        }
        categories
    }
}

/// The category configuration a report is built from
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub categories: Categories,
}

/// One resolved audit in a category: definition fields, raw result, computed score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<ScoreValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub result: AuditResult,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
}

/// A category after aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub id: String,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<ScoreValue>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub audits: Vec<AuditEntry>,
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
}

impl CategoryReport {
    /// Display name, falling back to the id
    pub fn name(&self) -> &str {
        self.extra
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(&self.id)
    }
}

/// The full aggregated tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Overall score (weighted mean of category scores)
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    /// Categories in configured order
    pub categories: Vec<CategoryReport>,
}

impl Report {
    /// Number of audit entries across all categories
    pub fn audit_count(&self) -> usize {
        self.categories.iter().map(|c| c.audits.len()).sum()
    }
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Grade a 0-100 score, rounding to the nearest whole point first
    pub fn from_score(score: f64) -> Self {
        match score.round() as i64 {
            90..=i64::MAX => Grade::A,
            80..=89 => Grade::B,
            70..=79 => Grade::C,
            60..=69 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::A => write!(f, "A"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}
