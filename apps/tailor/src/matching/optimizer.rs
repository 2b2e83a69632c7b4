//! Description Optimizer — generates rewrite candidates biased toward the
//! job's vocabulary and selects the best one under the authenticity
//! constraint.
//!
//! Authenticity: every numeric literal of the original description and every
//! technology name attached to the project must survive into a candidate, or
//! the candidate is discarded. When no candidate qualifies (or no backend is
//! configured) the optimizer returns the original description unchanged —
//! it never emits a fabricated or mangled rewrite.

use std::cmp::Ordering;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::EngineOptions;
use crate::errors::EngineError;
use crate::llm_client::TextGenerator;
use crate::matching::normalizer::tokenize;
use crate::matching::prompts::{REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM};
use crate::matching::scorer::{score_project, score_tokens};
use crate::models::project::Project;
use crate::models::report::OptimizedDescription;
use crate::models::skill::SkillAnalysis;

/// One candidate rewording. Ephemeral — only the winner survives into the
/// report.
#[derive(Debug, Clone)]
pub struct OptimizationCandidate {
    pub variant_text: String,
    /// Similarity against the job-skill vocabulary, in [0,100].
    pub similarity_score: f32,
    pub authenticity_ok: bool,
}

/// The quantitative claims a rewrite must preserve: numeric literals from
/// the description, and the project's technology names (the explicitly
/// flagged proper nouns).
#[derive(Debug, Clone)]
pub struct GuardedClaims {
    numbers: Vec<String>,
    proper_nouns: Vec<String>,
}

impl GuardedClaims {
    pub fn from_project(project: &Project) -> Self {
        Self {
            numbers: extract_numeric_literals(&project.description),
            proper_nouns: project.technologies.clone(),
        }
    }

    /// Numbers must appear verbatim; technology names case-insensitively.
    pub fn preserved_in(&self, candidate: &str) -> bool {
        let lowered = candidate.to_lowercase();
        self.numbers
            .iter()
            .all(|number| candidate.contains(number.as_str()))
            && self
                .proper_nouns
                .iter()
                .all(|noun| lowered.contains(&noun.to_lowercase()))
    }
}

/// Lexical scan for numeric literals: integers, decimals, and
/// comma-separated thousands ("141.35", "40", "1,200"). Deduplicated.
pub fn extract_numeric_literals(text: &str) -> Vec<String> {
    let mut literals: Vec<String> = Vec::new();
    let mut chars = text.chars().peekable();
    let mut current = String::new();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            current.push(ch);
        } else if (ch == '.' || ch == ',')
            && !current.is_empty()
            && chars.peek().is_some_and(|next| next.is_ascii_digit())
        {
            current.push(ch);
        } else if !current.is_empty() {
            let literal = std::mem::take(&mut current);
            if !literals.contains(&literal) {
                literals.push(literal);
            }
        }
    }
    if !current.is_empty() && !literals.contains(&current) {
        literals.push(current);
    }
    literals
}

/// Optimizes project descriptions toward a job's vocabulary.
pub struct DescriptionOptimizer {
    backend: Option<Arc<dyn TextGenerator>>,
    options: EngineOptions,
}

impl DescriptionOptimizer {
    pub fn new(backend: Option<Arc<dyn TextGenerator>>, options: EngineOptions) -> Self {
        Self { backend, options }
    }

    /// Requests `attempts` rewrite candidates, scores them, and returns the
    /// best authentic one — or the identity fallback when none qualifies.
    /// Never fails: an exhausted or absent backend degrades to the original
    /// text with its pre-rewrite similarity score.
    pub async fn optimize(
        &self,
        analysis: &SkillAnalysis,
        project: &Project,
        attempts: u32,
    ) -> OptimizedDescription {
        let attempts = attempts.max(1);
        let guarded = GuardedClaims::from_project(project);

        let candidates = match self.generate_candidates(analysis, project, attempts, &guarded).await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Description rewrite skipped for '{}': {e}", project.id);
                Vec::new()
            }
        };

        let discarded = candidates.iter().filter(|c| !c.authenticity_ok).count();
        if discarded > 0 {
            debug!(
                "Discarded {discarded} candidate(s) for '{}' that dropped guarded claims",
                project.id
            );
        }

        let winner = candidates
            .into_iter()
            .filter(|candidate| candidate.authenticity_ok)
            .max_by(|a, b| {
                a.similarity_score
                    .partial_cmp(&b.similarity_score)
                    .unwrap_or(Ordering::Equal)
            });

        match winner {
            Some(candidate) => OptimizedDescription {
                project_id: project.id.clone(),
                text: candidate.variant_text,
                original_text: project.description.clone(),
                similarity_score: candidate.similarity_score,
                used_fallback: false,
            },
            None => {
                let baseline = score_project(analysis, project, &self.options).score;
                OptimizedDescription {
                    project_id: project.id.clone(),
                    text: project.description.clone(),
                    original_text: project.description.clone(),
                    similarity_score: baseline,
                    used_fallback: true,
                }
            }
        }
    }

    /// One backend call per attempt. A failed call, an empty response, or a
    /// mangled variant is one failed attempt, not a hard failure.
    async fn generate_candidates(
        &self,
        analysis: &SkillAnalysis,
        project: &Project,
        attempts: u32,
        guarded: &GuardedClaims,
    ) -> Result<Vec<OptimizationCandidate>, EngineError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            EngineError::OptimizationUnavailable("no generative backend configured".to_string())
        })?;

        let prompt = build_rewrite_prompt(analysis, project);
        let mut candidates = Vec::new();

        for attempt in 1..=attempts {
            match backend.generate(&prompt, REWRITE_SYSTEM).await {
                Ok(response) => {
                    let variant = response.trim();
                    if variant.is_empty() {
                        warn!(
                            "Rewrite attempt {attempt}/{attempts} for '{}' returned empty text",
                            project.id
                        );
                        continue;
                    }
                    candidates.push(self.assess(analysis, project, variant.to_string(), guarded));
                }
                Err(e) => {
                    warn!(
                        "Rewrite attempt {attempt}/{attempts} for '{}' failed: {e}",
                        project.id
                    );
                }
            }
        }
        Ok(candidates)
    }

    /// Scores one variant: job-vocabulary overlap (same formula family as
    /// project scoring) times the length-deviation penalty, plus the
    /// authenticity verdict.
    fn assess(
        &self,
        analysis: &SkillAnalysis,
        project: &Project,
        variant_text: String,
        guarded: &GuardedClaims,
    ) -> OptimizationCandidate {
        let tokens = tokenize(&variant_text);
        let overlap = score_tokens(analysis, &tokens, &self.options).score;
        let penalty = length_penalty(
            project.description.chars().count(),
            variant_text.chars().count(),
            self.options.max_length_ratio,
        );
        let similarity_score = (overlap * penalty).clamp(0.0, 100.0);
        let authenticity_ok = guarded.preserved_in(&variant_text);

        OptimizationCandidate {
            variant_text,
            similarity_score,
            authenticity_ok,
        }
    }
}

/// 1.0 while the candidate stays within `max_ratio` of the original length;
/// beyond that the factor falls off linearly, floored at 0.25.
fn length_penalty(original_len: usize, candidate_len: usize, max_ratio: f32) -> f32 {
    if original_len == 0 {
        return 1.0;
    }
    let deviation =
        (candidate_len as f32 - original_len as f32).abs() / original_len as f32;
    if deviation <= max_ratio {
        1.0
    } else {
        (1.0 - (deviation - max_ratio)).clamp(0.25, 1.0)
    }
}

fn build_rewrite_prompt(analysis: &SkillAnalysis, project: &Project) -> String {
    let skills = analysis
        .all_skills()
        .map(|skill| skill.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let technologies = if project.technologies.is_empty() {
        "none listed".to_string()
    } else {
        project.technologies.join(", ")
    };

    REWRITE_PROMPT_TEMPLATE
        .replace("{description}", &project.description)
        .replace("{skills}", &skills)
        .replace("{technologies}", &technologies)
}
