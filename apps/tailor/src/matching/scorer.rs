//! Relevance Scorer — pure, deterministic scoring of (job skills, project)
//! pairs. No generative calls anywhere in this module.
//!
//! Algorithm:
//! 1. Tokenize the project description plus its technology list
//! 2. Per job skill: match strength 1.0 (exact phrase), 0.5 (stem match),
//!    0.0 otherwise
//! 3. Weighted overlap = Σ(weight × strength) / Σ(weight), in [0,1]
//! 4. Explicit-mention bonus when ≥1 explicit skill matches exactly
//! 5. Final score = clamp(overlap × 100 + bonus, 0, 100)

use std::cmp::Ordering;

use crate::config::EngineOptions;
use crate::matching::normalizer::{contains_phrase, stem, tokenize};
use crate::models::project::Project;
use crate::models::skill::{SkillAnalysis, SkillKind};

/// Strength at or above which a skill counts as demonstrated.
pub const DEMONSTRATED_THRESHOLD: f32 = 0.4;
/// Strength assigned to a stem-level (non-exact) match.
const PARTIAL_STRENGTH: f32 = 0.5;

/// Outcome of scoring one project against one skill set.
#[derive(Debug, Clone)]
pub struct RelevanceScore {
    /// Relevance in [0,100].
    pub score: f32,
    /// Demonstrated job-skill names, descending weight.
    pub demonstrated: Vec<String>,
    pub rationale: String,
}

/// Scores a project description (plus its technology list) against the
/// extracted job skills.
pub fn score_project(
    analysis: &SkillAnalysis,
    project: &Project,
    options: &EngineOptions,
) -> RelevanceScore {
    let mut tokens = tokenize(&project.description);
    for technology in &project.technologies {
        tokens.extend(tokenize(technology));
    }
    score_tokens(analysis, &tokens, options)
}

/// Scores an arbitrary token sequence against the extracted job skills.
/// Shared by project scoring and rewrite-candidate scoring.
pub fn score_tokens(
    analysis: &SkillAnalysis,
    tokens: &[String],
    options: &EngineOptions,
) -> RelevanceScore {
    let mut total_weight = 0.0_f32;
    let mut matched_weight = 0.0_f32;
    let mut explicit_exact = false;
    // (name, weight, strength) for every demonstrated skill
    let mut matches: Vec<(String, f32, f32)> = Vec::new();

    for skill in analysis.all_skills() {
        total_weight += skill.weight;
        let strength = match_strength(&skill.name, tokens);
        matched_weight += skill.weight * strength;

        if strength >= 1.0 && skill.kind == SkillKind::Explicit {
            explicit_exact = true;
        }
        if strength >= DEMONSTRATED_THRESHOLD {
            matches.push((skill.name.clone(), skill.weight, strength));
        }
    }

    if total_weight <= 0.0 {
        return RelevanceScore {
            score: 0.0,
            demonstrated: Vec::new(),
            rationale: "No weighted job skills to match against.".to_string(),
        };
    }

    let overlap = matched_weight / total_weight;
    let bonus = if explicit_exact {
        options.explicit_bonus
    } else {
        0.0
    };
    let score = (overlap * 100.0 + bonus).clamp(0.0, 100.0);

    // Descending weight; stable, so extraction order breaks weight ties
    matches.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let rationale = build_rationale(&matches);
    let demonstrated = matches.into_iter().map(|(name, _, _)| name).collect();

    RelevanceScore {
        score,
        demonstrated,
        rationale,
    }
}

/// Match strength of one skill name against a token sequence.
/// Exact contiguous phrase → 1.0; every word stem-matching some token →
/// 0.5; otherwise 0.0.
pub fn match_strength(skill_name: &str, tokens: &[String]) -> f32 {
    let phrase = tokenize(skill_name);
    if phrase.is_empty() {
        return 0.0;
    }
    if contains_phrase(tokens, &phrase) {
        return 1.0;
    }
    let all_words_stem_match = phrase
        .iter()
        .all(|word| tokens.iter().any(|token| stem(token) == stem(word)));
    if all_words_stem_match {
        PARTIAL_STRENGTH
    } else {
        0.0
    }
}

fn build_rationale(matches: &[(String, f32, f32)]) -> String {
    if matches.is_empty() {
        return "No job skills matched this description.".to_string();
    }

    let exact: Vec<&str> = matches
        .iter()
        .filter(|(_, _, strength)| *strength >= 1.0)
        .map(|(name, _, _)| name.as_str())
        .collect();
    let partial: Vec<&str> = matches
        .iter()
        .filter(|(_, _, strength)| *strength < 1.0)
        .map(|(name, _, _)| name.as_str())
        .collect();

    match (exact.is_empty(), partial.is_empty()) {
        (false, false) => format!(
            "Directly demonstrates {}; related evidence for {}.",
            exact.join(", "),
            partial.join(", ")
        ),
        (false, true) => format!("Directly demonstrates {}.", exact.join(", ")),
        (true, false) => format!("Related evidence for {}.", partial.join(", ")),
        (true, true) => "No job skills matched this description.".to_string(),
    }
}
