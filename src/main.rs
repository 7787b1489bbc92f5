//! Lantern: audit report CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use lantern::aggregator::{aggregate_stats, build_report};
use lantern::config::{discover_results, load_config, load_results, Config, CONFIG_FILENAME};
use lantern::reporter::{ConsoleReporter, HtmlReporter, JsonReporter, ReportAssets};
use lantern::Report;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Lantern: roll audit results up into scored reports
#[derive(Parser, Debug)]
#[command(name = "lantern")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Results JSON file or directory of results files (omit when using a subcommand)
    #[arg(required = true)]
    results: Option<PathBuf>,

    /// Path to config file (default: search lantern.config.json next to the results and in parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTML template with %%LIGHTHOUSE_JSON%% and %%LIGHTHOUSE_JAVASCRIPT%% placeholders
    #[arg(long)]
    template: Option<PathBuf>,

    /// Renderer script inlined into the template
    #[arg(long)]
    renderer: Option<PathBuf>,

    /// Output a self-contained HTML report
    #[arg(long, conflicts_with = "json")]
    html: bool,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,

    /// Write output here instead of stdout (a directory when RESULTS is a directory)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Minimum overall score (exit 1 if any report is below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (minimal output)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (list every audit)
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create lantern.config.json with an example category
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<f64>,

        /// Directory in which to create config, created if missing (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// A results file after aggregation (and rendering, with --html)
struct Built {
    source: PathBuf,
    report: Report,
    html: Option<String>,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(Commands::Init { threshold, dir }) = args.command {
        return run_init(threshold, dir.as_deref());
    }

    let results_path = args
        .results
        .clone()
        .context("a results path is required when not using a subcommand")?;

    // Resolve work directory for config search
    let work_dir = if results_path.is_file() {
        match results_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    } else {
        results_path.as_path()
    };

    // Load config (CLI flags override config file)
    let config = load_config(work_dir, args.config.as_deref())?.merge_with_cli(
        args.threshold,
        args.template.clone(),
        args.renderer.clone(),
    );

    let files = discover_results(&results_path)?;
    if files.is_empty() {
        eprintln!("{}: No results files found", "Warning".yellow());
        return Ok(ExitCode::SUCCESS);
    }

    let batch = results_path.is_dir();
    if args.html && batch && args.output.is_none() {
        anyhow::bail!("--html with a results directory requires --output <DIR>");
    }

    let html_reporter = if args.html {
        let assets = ReportAssets::load(config.template.as_deref(), config.renderer.as_deref())?;
        let reporter = HtmlReporter::from_assets(assets);
        if !args.quiet {
            for token in reporter.missing_placeholders() {
                eprintln!(
                    "{}: template has no {} placeholder",
                    "Warning".yellow(),
                    token
                );
            }
        }
        Some(reporter)
    } else {
        None
    };

    // Set up parallel processing
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let (built, had_errors) = build_all(&files, &config, html_reporter.as_ref(), args.quiet);
    if built.is_empty() {
        eprintln!("{}: All results files failed to build", "Error".red());
        return Ok(ExitCode::from(2));
    }

    if args.html {
        write_html(&built, &results_path, batch, args.output.as_deref(), args.quiet)?;
    } else if args.json {
        let reporter = if args.pretty {
            JsonReporter::new().pretty()
        } else {
            JsonReporter::new()
        };
        let json = if batch {
            let reports: Vec<Report> = built.iter().map(|b| b.report.clone()).collect();
            reporter.report_many(&reports)?
        } else {
            reporter.report(&built[0].report)?
        };
        emit(&json, args.output.as_deref())?;
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.no_color {
            reporter = reporter.without_colors();
        }
        if args.verbose {
            reporter = reporter.verbose();
        }

        if args.quiet {
            for b in &built {
                reporter.report_quiet(&b.source.display().to_string(), &b.report);
            }
        } else if batch {
            let reports: Vec<Report> = built.iter().map(|b| b.report.clone()).collect();
            let stats = aggregate_stats(&reports);
            let labelled: Vec<(String, Report)> = built
                .iter()
                .map(|b| (b.source.display().to_string(), b.report.clone()))
                .collect();
            reporter.report_many(&labelled, &stats);
        } else {
            reporter.report(&built[0].source.display().to_string(), &built[0].report);
        }
    }

    // Check threshold (config or CLI)
    if let Some(threshold) = config.threshold {
        let below: Vec<&Built> = built.iter().filter(|b| b.report.score < threshold).collect();
        if !below.is_empty() {
            if !args.quiet && !args.json {
                for b in &below {
                    eprintln!(
                        "{}: {} scored {:.1}, below threshold {}",
                        "Failed".red().bold(),
                        b.source.display(),
                        b.report.score,
                        threshold
                    );
                }
            }
            return Ok(ExitCode::from(1));
        }
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Build (and render) every results file in parallel; failures are reported
/// and skipped so the rest of a batch still completes.
fn build_all(
    files: &[PathBuf],
    config: &Config,
    html: Option<&HtmlReporter>,
    quiet: bool,
) -> (Vec<Built>, bool) {
    let outcomes: Vec<(PathBuf, Result<Built>)> = files
        .par_iter()
        .map(|file| (file.clone(), build_one(file, config, html)))
        .collect();

    let mut had_errors = false;
    let mut built = Vec::with_capacity(outcomes.len());
    for (file, outcome) in outcomes {
        match outcome {
            Ok(b) => built.push(b),
            Err(e) => {
                had_errors = true;
                if !quiet {
                    eprintln!("{}: {}: {:#}", "Error".red(), file.display(), e);
                }
            }
        }
    }
    (built, had_errors)
}

fn build_one(file: &Path, config: &Config, html: Option<&HtmlReporter>) -> Result<Built> {
    let results = load_results(file)?;
    let report = build_report(&config.report, &results)?;
    let html = html.map(|reporter| reporter.report(&report)).transpose()?;
    Ok(Built {
        source: file.to_path_buf(),
        report,
        html,
    })
}

fn write_html(
    built: &[Built],
    results_root: &Path,
    batch: bool,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    for b in built {
        let Some(html) = b.html.as_deref() else {
            continue;
        };
        let target = match output {
            Some(out) if batch => {
                let relative = b.source.strip_prefix(results_root).unwrap_or(b.source.as_path());
                out.join(relative).with_extension("html")
            }
            Some(out) => out.to_path_buf(),
            None => {
                print!("{}", html);
                continue;
            }
        };
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        fs::write(&target, html)
            .with_context(|| format!("Failed to write report to {}", target.display()))?;
        if !quiet {
            eprintln!("{}: Wrote {}", "Info".blue(), target.display());
        }
    }
    Ok(())
}

/// Print to stdout, or write to a file when --output is given
fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write output to {}", path.display())),
        None => {
            println!("{}", text);
            Ok(())
        }
    }
}

fn run_init(threshold: Option<f64>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(70.0);

    let json = format!(
        r#"{{
  "threshold": {},
  "categories": {{
    "performance": {{
      "name": "Performance",
      "description": "How quickly the page becomes usable.",
      "weight": 1,
      "audits": [
        {{ "id": "first-contentful-paint", "weight": 3 }},
        {{ "id": "interactive", "weight": 5 }}
      ]
    }},
    "best-practices": {{
      "name": "Best Practices",
      "weight": 1,
      "audits": [
        {{ "id": "uses-https", "weight": 1 }},
        {{ "id": "no-console-errors", "weight": 1 }}
      ]
    }}
  }}
}}
"#,
        threshold_value
    );

    fs::write(&config_path, json)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}
