//! Console reporter with colored output

use crate::aggregator::{grade_description, AggregateStats};
use crate::{Grade, Report, ScoreValue};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list every audit
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print a single report
    pub fn report(&self, source: &str, report: &Report) {
        print!("{}", self.render(source, report));
    }

    /// Print several reports followed by a summary
    pub fn report_many(&self, reports: &[(String, Report)], stats: &AggregateStats) {
        for (source, report) in reports {
            self.report(source, report);
            println!("{}", "─".repeat(60));
        }
        print!("{}", self.render_summary(stats));
    }

    /// Print the score only
    pub fn report_quiet(&self, source: &str, report: &Report) {
        println!("{}", self.render_quiet(source, report));
    }

    pub fn render_quiet(&self, source: &str, report: &Report) -> String {
        let grade = Grade::from_score(report.score);
        format!(
            "{}: {} ({})",
            source,
            format_score(report.score),
            self.colorize_grade(grade)
        )
    }

    /// Render a report as console text
    pub fn render(&self, source: &str, report: &Report) -> String {
        let mut out = String::new();
        let grade = Grade::from_score(report.score);

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.bold(&format!("Audit Report: {}", source)));
        let _ = writeln!(
            out,
            "   Categories: {} | Audits: {}",
            report.categories.len(),
            report.audit_count()
        );
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "   Score: {} {}",
            self.create_score_bar(report.score),
            self.bold(&self.colorize_grade(grade))
        );
        let _ = writeln!(out, "   {}", self.dimmed(grade_description(grade)));
        let _ = writeln!(out);

        if report.categories.is_empty() {
            let _ = writeln!(out, "   {}", self.dimmed("No categories configured"));
            return out;
        }

        let _ = writeln!(out, "   {}", self.bold("Categories:"));
        for category in &report.categories {
            let _ = writeln!(
                out,
                "   {} {} {} (weight {})",
                self.create_mini_bar(category.score),
                self.colorize_score(format!("{:>5}", format_score(category.score)), category.score),
                category.name(),
                format_weight(category.weight.as_ref())
            );

            if self.verbose {
                for audit in &category.audits {
                    let _ = writeln!(
                        out,
                        "        {} {} (weight {})",
                        self.colorize_score(format!("{:>5}", format_score(audit.score)), audit.score),
                        audit.id,
                        format_weight(audit.weight.as_ref())
                    );
                }
            }
        }
        let _ = writeln!(out);
        out
    }

    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Reports:        {}", stats.reports);
        let _ = writeln!(
            out,
            "   Average score:  {} ({})",
            format_score(stats.average_score),
            self.colorize_grade(Grade::from_score(stats.average_score))
        );
        let _ = writeln!(out, "   Categories:     {}", stats.total_categories);
        let _ = writeln!(out, "   Audits:         {}", stats.total_audits);
        let _ = writeln!(out);
        out
    }

    fn colorize_grade(&self, grade: Grade) -> String {
        let s = grade.to_string();
        if !self.use_colors {
            return s;
        }
        match grade {
            Grade::A => s.green().bold().to_string(),
            Grade::B => s.green().to_string(),
            Grade::C => s.yellow().to_string(),
            Grade::D => s.red().to_string(),
            Grade::F => s.red().bold().to_string(),
        }
    }

    fn colorize_score(&self, text: String, score: f64) -> String {
        if !self.use_colors {
            return text;
        }
        if score >= 80.0 {
            text.green().to_string()
        } else if score >= 60.0 {
            text.yellow().to_string()
        } else {
            text.red().to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dimmed(&self, text: &str) -> String {
        if self.use_colors {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let filled = bar_cells(score, 20);
        let bar = format!(
            "[{}{}] {:>3}%",
            "█".repeat(filled),
            "░".repeat(20 - filled),
            score.round() as i64
        );
        self.colorize_score(bar, score)
    }

    fn create_mini_bar(&self, score: f64) -> String {
        let filled = bar_cells(score, 10);
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(10 - filled))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of filled cells out of `width` for a 0-100 score
fn bar_cells(score: f64, width: usize) -> usize {
    let clamped = score.clamp(0.0, 100.0);
    ((clamped * width as f64) / 100.0).floor() as usize
}

/// One decimal at most, no trailing `.0`
fn format_score(score: f64) -> String {
    let rounded = (score * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

fn format_weight(weight: Option<&ScoreValue>) -> String {
    format_score(weight.map_or(0.0, ScoreValue::as_number))
}
