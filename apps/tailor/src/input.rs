//! File plumbing around the engine: portfolio, vocabulary and
//! job-description loading, report writing. The engine itself only ever
//! sees in-memory structures.

use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use chrono::Utc;
use serde_json::json;

use crate::matching::extractor::Vocabulary;
use crate::models::project::Project;
use crate::models::report::MatchReport;

/// Loads the portfolio: a JSON array of project records keyed by `title`
/// (or `id`).
pub fn load_projects(path: &Path) -> Result<Vec<Project>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading portfolio file {}", path.display()))?;
    let projects: Vec<Project> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing portfolio file {}", path.display()))?;
    Ok(projects)
}

/// Loads the controlled skill vocabulary.
pub fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading vocabulary file {}", path.display()))?;
    parse_vocabulary(&raw).with_context(|| format!("parsing vocabulary file {}", path.display()))
}

/// Accepts both vocabulary layouts: the full form with `categories` /
/// `implications` keys, and the bare category → terms map.
pub fn parse_vocabulary(raw: &str) -> Result<Vocabulary> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if value.get("categories").is_some() || value.get("implications").is_some() {
        Ok(serde_json::from_value(value)?)
    } else {
        let categories = serde_json::from_value(value)?;
        Ok(Vocabulary {
            categories,
            implications: Vec::new(),
        })
    }
}

/// Loads the job description text.
pub fn load_job_description(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading job description {}", path.display()))?;
    ensure!(
        !text.trim().is_empty(),
        "job description {} is empty",
        path.display()
    );
    Ok(text)
}

/// Writes the match report as pretty JSON, creating parent directories.
pub fn write_report(path: &Path, report: &MatchReport) -> Result<()> {
    write_json(path, &serde_json::to_string_pretty(report)?)
}

/// Writes an error object in place of a report when the run fails.
pub fn write_error_report(path: &Path, error: &str) -> Result<()> {
    let body = serde_json::to_string_pretty(&json!({
        "error": error,
        "timestamp": Utc::now().to_rfc3339(),
    }))?;
    write_json(path, &body)
}

fn write_json(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating output directory {}", parent.display()))?;
        }
    }
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_projects_from_original_layout() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "RL Agent", "description": "reinforcement learning", "technologies": ["PyTorch"]}}]"#
        )
        .unwrap();
        let projects = load_projects(file.path()).unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "RL Agent");
        assert_eq!(projects[0].technologies, vec!["PyTorch"]);
    }

    #[test]
    fn test_load_projects_bad_json_has_path_context() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = load_projects(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing portfolio file"));
    }

    #[test]
    fn test_parse_vocabulary_bare_category_map() {
        let vocabulary = parse_vocabulary(
            r#"{"Languages": ["Rust", "Python"], "Technologies": ["Kafka"]}"#,
        )
        .unwrap();
        assert_eq!(vocabulary.categories.len(), 2);
        assert_eq!(vocabulary.categories["Languages"], vec!["Rust", "Python"]);
        assert!(vocabulary.implications.is_empty());
    }

    #[test]
    fn test_parse_vocabulary_full_form_with_implications() {
        let vocabulary = parse_vocabulary(
            r#"{
                "categories": {"Domain": ["failure analysis"]},
                "implications": [
                    {"when": "failure analysis", "implies": "root cause analysis"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(vocabulary.implications.len(), 1);
        assert_eq!(vocabulary.implications[0].implies, "root cause analysis");
    }

    #[test]
    fn test_load_job_description_rejects_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = load_job_description(file.path()).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_write_report_creates_parent_directories() {
        use crate::models::skill::SkillAnalysis;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        let report = MatchReport {
            generated_at: Utc::now(),
            skill_analysis: SkillAnalysis::default(),
            ranked_projects: vec![],
            optimized_descriptions: vec![],
        };
        write_report(&path, &report).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("ranked_projects"));
    }

    #[test]
    fn test_write_error_report_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_error_report(&path, "extraction unavailable").unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["error"], "extraction unavailable");
        assert!(value["timestamp"].is_string());
    }
}
