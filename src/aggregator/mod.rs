//! Score aggregation: audits → categories → overall score

pub mod engine;
pub mod scoring;

pub use engine::{aggregate_stats, build_report, AggregateStats};
pub use scoring::{grade_description, weighted_mean, Scored, ScoredItem};
