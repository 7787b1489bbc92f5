//! Configuration and input loading for Lantern

mod schema;

pub use schema::Config;

use crate::AuditResult;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CONFIG_FILENAME: &str = "lantern.config.json";

/// Find and load the config. Searches `work_dir` then its parents unless a
/// path is given explicitly.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = locate_config(work_dir, custom_path, None)?;
    load_config_file(&path)
}

/// Resolve the config path; the parent search stops at `ceiling` when given
fn locate_config(
    work_dir: &Path,
    custom_path: Option<&Path>,
    ceiling: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(p) = custom_path {
        if !p.exists() {
            anyhow::bail!("Config file not found: {}", p.display());
        }
        return Ok(p.to_path_buf());
    }

    match find_config_in_parents(work_dir, ceiling) {
        Some(path) => Ok(path),
        None => anyhow::bail!(
            "No {} found in {} or its parents (pass --config)",
            CONFIG_FILENAME,
            work_dir.display()
        ),
    }
}

/// Load one config file; asset paths are resolved relative to it
pub fn load_config_file(config_path: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    config.resolve_paths(config_dir);
    Ok(config)
}

/// Search for lantern.config.json in directory and its parents, up to and
/// including `ceiling`
fn find_config_in_parents(mut dir: &Path, ceiling: Option<&Path>) -> Option<PathBuf> {
    loop {
        let candidate = dir.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if ceiling.is_some_and(|top| dir == top) {
            return None;
        }
        dir = dir.parent()?;
    }
}

/// Load an audit-runner results file: a JSON object of audit id → result
pub fn load_results(path: &Path) -> Result<HashMap<String, AuditResult>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read results: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid results JSON: {}", path.display()))
}

/// Results files under `path`: the file itself, or every `*.json` below a
/// directory (config files excluded), sorted for stable output.
pub fn discover_results(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        anyhow::bail!("Results path not found: {}", path.display());
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_results_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_results_file(path: &Path) -> bool {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let is_config = path.file_name().is_some_and(|name| name == CONFIG_FILENAME);
    is_json && !is_config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScoreValue;
    use tempfile::TempDir;

    const CONFIG: &str = r#"{
        "threshold": 60,
        "renderer": "assets/renderer.js",
        "categories": {
            "seo": {"weight": 1, "audits": [{"id": "title", "weight": 1}]}
        }
    }"#;

    #[test]
    fn test_finds_config_in_parent() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), CONFIG).unwrap();
        let nested = dir.path().join("runs").join("today");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.threshold, Some(60.0));
        assert_eq!(config.report.categories.len(), 1);
        assert_eq!(
            config.renderer,
            Some(dir.path().join("assets/renderer.js"))
        );
    }

    #[test]
    fn test_no_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("runs");
        fs::create_dir_all(&nested).unwrap();

        let err = locate_config(&nested, None, Some(dir.path())).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILENAME));
        assert!(err.to_string().contains("--config"));
    }

    #[test]
    fn test_search_stops_at_ceiling() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), CONFIG).unwrap();
        let project = dir.path().join("project");
        let runs = project.join("runs");
        fs::create_dir_all(&runs).unwrap();

        assert_eq!(find_config_in_parents(&runs, Some(project.as_path())), None);
        assert_eq!(
            find_config_in_parents(&runs, Some(dir.path())),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_invalid_config_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(dir.path(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON in config"));
    }

    #[test]
    fn test_load_results() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        fs::write(
            &path,
            r#"{"title": {"score": true}, "speed": {"score": 0.5, "displayValue": "1.2s"}}"#,
        )
        .unwrap();
        let results = load_results(&path).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results["title"].score, Some(ScoreValue::Bool(true)));
        assert_eq!(results["speed"].extra["displayValue"], "1.2s");
    }

    #[test]
    fn test_discover_results_skips_config_and_other_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), CONFIG).unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir_all(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("a.json"), "{}").unwrap();

        let files = discover_results(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("b.json"), dir.path().join("sub").join("a.json")]
        );
    }

    #[test]
    fn test_discover_single_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, "{}").unwrap();
        assert_eq!(discover_results(&path).unwrap(), vec![path]);
        assert!(discover_results(&dir.path().join("missing")).is_err());
    }
}
