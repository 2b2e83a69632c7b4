use serde::{Deserialize, Serialize};

/// Whether a skill was literally named in the job text or inferred from context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    Explicit,
    Implicit,
}

/// A single skill mention extracted from a job description.
///
/// `weight` is always within [0,100] — `Skill::new` clamps it on construction
/// so no downstream consumer needs to re-check the bound.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub kind: SkillKind,
    pub weight: f32,
    pub rationale: String,
}

impl Skill {
    pub fn new(
        name: impl Into<String>,
        kind: SkillKind,
        weight: f32,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            weight: weight.clamp(0.0, 100.0),
            rationale: rationale.into(),
        }
    }
}

/// A recommended grouping of skill names for display (e.g. "Languages").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGroup {
    pub heading: String,
    pub skills: Vec<String>,
}

/// Full output of a skill extraction pass over one job description.
///
/// Skill order within each list is insertion order and is preserved for
/// display. Names are unique across both lists after extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillAnalysis {
    pub explicit: Vec<Skill>,
    pub implicit: Vec<Skill>,
    pub recommended_groups: Vec<SkillGroup>,
}

impl SkillAnalysis {
    /// All skills, explicit first, in insertion order.
    pub fn all_skills(&self) -> impl Iterator<Item = &Skill> {
        self.explicit.iter().chain(self.implicit.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty() && self.implicit.is_empty()
    }
}
