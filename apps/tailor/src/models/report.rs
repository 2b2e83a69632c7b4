use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::skill::SkillAnalysis;

/// A project with its relevance score against one job description.
/// Rebuilt in full on every ranking pass — never incrementally patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredProject {
    pub project_id: String,
    /// Relevance in [0,100].
    pub score: f32,
    pub rationale: String,
    /// Job-skill names this project demonstrates, strongest weight first.
    pub demonstrated_skills: Vec<String>,
    pub adaptation_hint: String,
}

/// The winning rewrite of a project description (or the untouched original
/// when every candidate failed the authenticity check).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizedDescription {
    pub project_id: String,
    pub text: String,
    pub original_text: String,
    /// Similarity against the job-skill vocabulary, in [0,100].
    pub similarity_score: f32,
    /// True when the identity fallback was taken instead of a rewrite.
    pub used_fallback: bool,
}

/// Aggregate output of one match run. Built once, immutable after assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub skill_analysis: SkillAnalysis,
    pub ranked_projects: Vec<ScoredProject>,
    pub optimized_descriptions: Vec<OptimizedDescription>,
}
