//! Weighted-average scoring

use crate::{finite_or_zero, nan_to_zero, AuditEntry, CategoryReport, Grade, ScoreValue};

/// Anything that contributes a score and a weight to a weighted mean
pub trait Scored {
    fn score(&self) -> f64;
    fn weight(&self) -> f64;
}

impl<T: Scored + ?Sized> Scored for &T {
    fn score(&self) -> f64 {
        (**self).score()
    }

    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

/// A loosely typed (score, weight) pair
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoredItem {
    pub score: ScoreValue,
    pub weight: ScoreValue,
}

impl ScoredItem {
    pub fn new(score: impl Into<ScoreValue>, weight: impl Into<ScoreValue>) -> Self {
        Self {
            score: score.into(),
            weight: weight.into(),
        }
    }
}

impl Scored for ScoredItem {
    fn score(&self) -> f64 {
        self.score.as_number()
    }

    fn weight(&self) -> f64 {
        self.weight.as_number()
    }
}

impl Scored for AuditEntry {
    fn score(&self) -> f64 {
        self.score
    }

    fn weight(&self) -> f64 {
        self.weight.as_ref().map_or(0.0, ScoreValue::as_number)
    }
}

impl Scored for CategoryReport {
    fn score(&self) -> f64 {
        self.score
    }

    fn weight(&self) -> f64 {
        self.weight.as_ref().map_or(0.0, ScoreValue::as_number)
    }
}

/// Weighted arithmetic mean: Σ(score × weight) / Σ(weight).
///
/// Total over every input. NaN scores or weights count as 0; infinities are
/// summed as given. A zero total weight (including an empty sequence) or a
/// non-finite quotient yields 0.
pub fn weighted_mean<I>(items: I) -> f64
where
    I: IntoIterator,
    I::Item: Scored,
{
    let (sum, total_weight) = items.into_iter().fold((0.0, 0.0), |(sum, total), item| {
        let score = nan_to_zero(item.score());
        let weight = nan_to_zero(item.weight());
        (sum + score * weight, total + weight)
    });

    if total_weight == 0.0 {
        return 0.0;
    }
    finite_or_zero(sum / total_weight)
}

/// Get a description of the grade
pub fn grade_description(grade: Grade) -> &'static str {
    match grade {
        Grade::A => "Excellent - audits pass across the board",
        Grade::B => "Good - a few audits need attention",
        Grade::C => "Fair - several weighted audits are failing",
        Grade::D => "Poor - significant audit failures",
        Grade::F => "Failing - most weighted audits fail",
    }
}
