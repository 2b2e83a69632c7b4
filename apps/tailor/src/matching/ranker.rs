//! Project Ranker — orders the portfolio by relevance score.
//!
//! Pure function of its inputs: ranking twice on identical inputs yields an
//! identical ordered result. Length-preserving — no project is ever dropped,
//! whatever its score.
//!
//! Tie-break for equal scores: more distinct demonstrated skills first; the
//! stable sort then preserves original portfolio order.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::debug;

use crate::config::EngineOptions;
use crate::errors::EngineError;
use crate::matching::scorer::{score_project, RelevanceScore};
use crate::models::project::Project;
use crate::models::report::ScoredProject;
use crate::models::skill::SkillAnalysis;

/// Ranks the full portfolio against the extracted job skills.
pub fn rank(
    analysis: &SkillAnalysis,
    projects: &[Project],
    options: &EngineOptions,
) -> Result<Vec<ScoredProject>, EngineError> {
    validate_portfolio(projects)?;

    let mut scored: Vec<ScoredProject> = projects
        .iter()
        .map(|project| {
            let relevance = score_project(analysis, project, options);
            debug!(
                "Scored '{}': {:.1} ({} demonstrated skills)",
                project.id,
                relevance.score,
                relevance.demonstrated.len()
            );
            ScoredProject {
                project_id: project.id.clone(),
                score: relevance.score,
                adaptation_hint: build_adaptation_hint(analysis, &relevance),
                rationale: relevance.rationale,
                demonstrated_skills: relevance.demonstrated,
            }
        })
        .collect();

    // Stable sort: score descending, then demonstrated-skill count
    // descending; equal-ranked items keep their portfolio order.
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.demonstrated_skills.len().cmp(&a.demonstrated_skills.len()))
    });

    Ok(scored)
}

/// Caller contract: every project id is non-empty and unique. Violations
/// are reported immediately, never retried.
pub fn validate_portfolio(projects: &[Project]) -> Result<(), EngineError> {
    let mut seen = HashSet::new();
    for project in projects {
        let id = project.id.trim();
        if id.is_empty() {
            return Err(EngineError::InvalidPortfolio(
                "project with an empty id (title)".to_string(),
            ));
        }
        if !seen.insert(id.to_string()) {
            return Err(EngineError::InvalidPortfolio(format!(
                "duplicate project id: {id}"
            )));
        }
    }
    Ok(())
}

/// Deterministic hint on how to slant this project for the posting: lead
/// with the strongest matched skills, surface the heaviest unmatched ones
/// if the experience genuinely exists.
fn build_adaptation_hint(analysis: &SkillAnalysis, relevance: &RelevanceScore) -> String {
    if relevance.demonstrated.is_empty() {
        return "Only tangential overlap with this role; keep the description factual \
                rather than forcing the posting's vocabulary in."
            .to_string();
    }

    let lead: Vec<&str> = relevance
        .demonstrated
        .iter()
        .take(3)
        .map(String::as_str)
        .collect();

    let mut unmatched: Vec<&crate::models::skill::Skill> = analysis
        .all_skills()
        .filter(|skill| !relevance.demonstrated.iter().any(|d| d == &skill.name))
        .collect();
    unmatched.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));

    let mut hint = format!("Lead with {}.", lead.join(", "));
    if let Some(top_gap) = unmatched.first() {
        hint.push_str(&format!(
            " If accurate, also surface any {} experience — the posting weights it heavily.",
            top_gap.name
        ));
    }
    hint
}
