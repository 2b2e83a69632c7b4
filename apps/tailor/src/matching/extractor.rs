//! Skill Extractor — derives explicit and implicit skill mentions from a job
//! description.
//!
//! The extraction contract is a trait so evidence sources are swappable:
//! `LlmSkillExtractor` consults the generative backend, and
//! `VocabularySkillExtractor` is the deterministic path used for offline
//! runs, tests, and as the fallback when the service is exhausted. Partial
//! or low-confidence backend output is kept with a reduced weight rather
//! than discarded.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::errors::EngineError;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::matching::normalizer::{contains_phrase, count_phrase, tokenize};
use crate::matching::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM};
use crate::models::skill::{Skill, SkillAnalysis, SkillGroup, SkillKind};

/// Weight given to a vocabulary term mentioned once; each further mention
/// adds 10, capped at 100.
const EXPLICIT_BASE_WEIGHT: f32 = 70.0;
/// Implicit weight band for vocabulary implications.
const IMPLICIT_MIN_WEIGHT: f32 = 60.0;
const IMPLICIT_MAX_WEIGHT: f32 = 90.0;
/// Assigned when the backend omits a weight — kept, but demoted.
const REDUCED_EXPLICIT_WEIGHT: f32 = 70.0;
const REDUCED_IMPLICIT_WEIGHT: f32 = 60.0;

/// The extraction contract. Implementations must never fail on odd input
/// text — an empty analysis is a valid result.
#[async_trait]
pub trait SkillExtractor: Send + Sync {
    async fn extract(&self, job_text: &str) -> Result<SkillAnalysis, EngineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Controlled vocabulary
// ────────────────────────────────────────────────────────────────────────────

/// A domain-context rule: if `when` occurs in the job text, the role
/// implies the `implies` skill even when it is not literally named.
#[derive(Debug, Clone, Deserialize)]
pub struct ImplicationRule {
    pub when: String,
    pub implies: String,
    #[serde(default = "default_implication_weight")]
    pub weight: f32,
    #[serde(default)]
    pub rationale: Option<String>,
}

fn default_implication_weight() -> f32 {
    75.0
}

/// Controlled skill vocabulary: category → terms, plus implication rules.
/// Categories double as the fallback's recommended groupings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Vocabulary {
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub implications: Vec<ImplicationRule>,
}

// ────────────────────────────────────────────────────────────────────────────
// LlmSkillExtractor — generative path
// ────────────────────────────────────────────────────────────────────────────

/// Extracts skills via the generative backend. The response is untrusted
/// text: it is parsed and validated here, weights are clamped into bounds,
/// and names are deduplicated keeping the first occurrence.
pub struct LlmSkillExtractor {
    backend: Arc<dyn TextGenerator>,
}

#[derive(Debug, Deserialize)]
struct RawSkill {
    #[serde(alias = "skill")]
    name: String,
    #[serde(default, alias = "relevance")]
    weight: Option<f32>,
    #[serde(default, alias = "reason")]
    rationale: String,
}

#[derive(Debug, Deserialize)]
struct RawGroup {
    heading: String,
    #[serde(default)]
    skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    #[serde(default)]
    explicit_skills: Vec<RawSkill>,
    #[serde(default)]
    implicit_skills: Vec<RawSkill>,
    #[serde(default)]
    recommended_groups: Vec<RawGroup>,
}

impl LlmSkillExtractor {
    pub fn new(backend: Arc<dyn TextGenerator>) -> Self {
        Self { backend }
    }

    fn sanitize(raw: RawAnalysis) -> SkillAnalysis {
        let mut seen = HashSet::new();
        let explicit = sanitize_skills(
            raw.explicit_skills,
            SkillKind::Explicit,
            REDUCED_EXPLICIT_WEIGHT,
            &mut seen,
        );
        let implicit = sanitize_skills(
            raw.implicit_skills,
            SkillKind::Implicit,
            REDUCED_IMPLICIT_WEIGHT,
            &mut seen,
        );
        let recommended_groups = raw
            .recommended_groups
            .into_iter()
            .filter(|group| !group.heading.trim().is_empty() && !group.skills.is_empty())
            .map(|group| SkillGroup {
                heading: group.heading,
                skills: group.skills,
            })
            .collect();

        SkillAnalysis {
            explicit,
            implicit,
            recommended_groups,
        }
    }
}

fn sanitize_skills(
    raw: Vec<RawSkill>,
    kind: SkillKind,
    reduced_weight: f32,
    seen: &mut HashSet<String>,
) -> Vec<Skill> {
    let mut skills = Vec::new();
    for entry in raw {
        let normalized = tokenize(&entry.name).join(" ");
        if normalized.is_empty() || !seen.insert(normalized) {
            continue;
        }
        // A missing weight is partial output — demote, don't discard
        let weight = entry.weight.unwrap_or(reduced_weight);
        skills.push(Skill::new(entry.name, kind, weight, entry.rationale));
    }
    skills
}

#[async_trait]
impl SkillExtractor for LlmSkillExtractor {
    async fn extract(&self, job_text: &str) -> Result<SkillAnalysis, EngineError> {
        let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{job_text}", job_text);
        let response = self
            .backend
            .generate(&prompt, SKILL_EXTRACTION_SYSTEM)
            .await
            .map_err(EngineError::from)?;

        let raw: RawAnalysis = serde_json::from_str(strip_json_fences(&response))
            .map_err(|e| EngineError::MalformedResponse(format!("skill extraction: {e}")))?;

        let analysis = Self::sanitize(raw);
        debug!(
            "Generative extraction: {} explicit, {} implicit skills",
            analysis.explicit.len(),
            analysis.implicit.len()
        );
        Ok(analysis)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// VocabularySkillExtractor — deterministic path
// ────────────────────────────────────────────────────────────────────────────

/// Pure-Rust extractor over the controlled vocabulary. Fast, deterministic,
/// no network. Produces an empty analysis (never an error) for an empty
/// vocabulary or job text.
pub struct VocabularySkillExtractor {
    vocabulary: Vocabulary,
}

impl VocabularySkillExtractor {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }
}

#[async_trait]
impl SkillExtractor for VocabularySkillExtractor {
    async fn extract(&self, job_text: &str) -> Result<SkillAnalysis, EngineError> {
        let tokens = tokenize(job_text);
        let mut seen = HashSet::new();
        let mut explicit = Vec::new();
        let mut groups: Vec<SkillGroup> = Vec::new();

        for (category, terms) in &self.vocabulary.categories {
            let mut matched_terms = Vec::new();
            for term in terms {
                let phrase = tokenize(term);
                if phrase.is_empty() {
                    continue;
                }
                let mentions = count_phrase(&tokens, &phrase);
                if mentions == 0 || !seen.insert(phrase.join(" ")) {
                    continue;
                }
                let weight =
                    (EXPLICIT_BASE_WEIGHT + 10.0 * (mentions as f32 - 1.0)).min(100.0);
                explicit.push(Skill::new(
                    term.clone(),
                    SkillKind::Explicit,
                    weight,
                    format!("Named {mentions} time(s) in the job text ({category})."),
                ));
                matched_terms.push(term.clone());
            }
            if !matched_terms.is_empty() {
                groups.push(SkillGroup {
                    heading: category.clone(),
                    skills: matched_terms,
                });
            }
        }

        let mut implicit = Vec::new();
        for rule in &self.vocabulary.implications {
            let trigger = tokenize(&rule.when);
            if trigger.is_empty() || !contains_phrase(&tokens, &trigger) {
                continue;
            }
            if !seen.insert(tokenize(&rule.implies).join(" ")) {
                continue;
            }
            let weight = rule.weight.clamp(IMPLICIT_MIN_WEIGHT, IMPLICIT_MAX_WEIGHT);
            let rationale = rule
                .rationale
                .clone()
                .unwrap_or_else(|| format!("Implied by \"{}\" in the job text.", rule.when));
            implicit.push(Skill::new(
                rule.implies.clone(),
                SkillKind::Implicit,
                weight,
                rationale,
            ));
        }

        debug!(
            "Vocabulary extraction: {} explicit, {} implicit skills",
            explicit.len(),
            implicit.len()
        );
        Ok(SkillAnalysis {
            explicit,
            implicit,
            recommended_groups: groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedGenerator {
        responses: Mutex<VecDeque<Result<String, LlmError>>>,
    }

    impl ScriptedGenerator {
        fn new(responses: Vec<Result<String, LlmError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into_iter().collect()),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn vocabulary() -> Vocabulary {
        let mut categories = BTreeMap::new();
        categories.insert(
            "Languages".to_string(),
            vec!["Rust".to_string(), "Python".to_string()],
        );
        categories.insert(
            "Technologies".to_string(),
            vec!["Kafka".to_string(), "reinforcement learning".to_string()],
        );
        Vocabulary {
            categories,
            implications: vec![ImplicationRule {
                when: "failure analysis".to_string(),
                implies: "root cause analysis".to_string(),
                weight: 75.0,
                rationale: None,
            }],
        }
    }

    #[tokio::test]
    async fn test_vocabulary_extractor_finds_explicit_terms() {
        let extractor = VocabularySkillExtractor::new(vocabulary());
        let analysis = extractor
            .extract("We need Rust and Kafka experience for stream processing.")
            .await
            .unwrap();

        let names: Vec<&str> = analysis.explicit.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"Rust"));
        assert!(names.contains(&"Kafka"));
        assert!(!names.contains(&"Python"));
        for skill in &analysis.explicit {
            assert!(skill.weight >= 70.0 && skill.weight <= 100.0);
            assert_eq!(skill.kind, SkillKind::Explicit);
        }
    }

    #[tokio::test]
    async fn test_vocabulary_extractor_weights_scale_with_mentions() {
        let extractor = VocabularySkillExtractor::new(vocabulary());
        let analysis = extractor
            .extract("Rust. More Rust. Daily Rust. We really mean Rust.")
            .await
            .unwrap();
        let rust = &analysis.explicit[0];
        assert_eq!(rust.name, "Rust");
        // 70 base + 10 per extra mention, 4 mentions → 100
        assert_eq!(rust.weight, 100.0);
    }

    #[tokio::test]
    async fn test_vocabulary_extractor_applies_implications() {
        let extractor = VocabularySkillExtractor::new(vocabulary());
        let analysis = extractor
            .extract("The role involves failure analysis of production incidents.")
            .await
            .unwrap();
        assert_eq!(analysis.implicit.len(), 1);
        let implied = &analysis.implicit[0];
        assert_eq!(implied.name, "root cause analysis");
        assert_eq!(implied.kind, SkillKind::Implicit);
        assert!(implied.weight >= 60.0 && implied.weight <= 90.0);
        assert!(implied.rationale.contains("failure analysis"));
    }

    #[tokio::test]
    async fn test_vocabulary_extractor_multiword_phrase_match() {
        let extractor = VocabularySkillExtractor::new(vocabulary());
        let analysis = extractor
            .extract("Experience with reinforcement learning is required.")
            .await
            .unwrap();
        let names: Vec<&str> = analysis.explicit.iter().map(|s| s.name.as_str()).collect();
        assert!(names.contains(&"reinforcement learning"));
    }

    #[tokio::test]
    async fn test_empty_vocabulary_yields_empty_analysis_not_error() {
        let extractor = VocabularySkillExtractor::new(Vocabulary::default());
        let analysis = extractor.extract("Rust everywhere").await.unwrap();
        assert!(analysis.is_empty());
        assert!(analysis.recommended_groups.is_empty());
    }

    #[tokio::test]
    async fn test_vocabulary_groups_only_matched_categories() {
        let extractor = VocabularySkillExtractor::new(vocabulary());
        let analysis = extractor.extract("Just Rust here.").await.unwrap();
        assert_eq!(analysis.recommended_groups.len(), 1);
        assert_eq!(analysis.recommended_groups[0].heading, "Languages");
        assert_eq!(analysis.recommended_groups[0].skills, vec!["Rust"]);
    }

    #[tokio::test]
    async fn test_llm_extractor_parses_valid_response() {
        let backend = ScriptedGenerator::new(vec![Ok(r#"{
            "explicit_skills": [
                {"name": "Rust", "weight": 95, "rationale": "named in requirements"}
            ],
            "implicit_skills": [
                {"name": "systems design", "weight": 72, "rationale": "implied by scope"}
            ],
            "recommended_groups": [
                {"heading": "Languages", "skills": ["Rust"]}
            ]
        }"#
        .to_string())]);

        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit.len(), 1);
        assert_eq!(analysis.explicit[0].weight, 95.0);
        assert_eq!(analysis.implicit[0].name, "systems design");
        assert_eq!(analysis.recommended_groups[0].heading, "Languages");
    }

    #[tokio::test]
    async fn test_llm_extractor_strips_code_fences() {
        let fenced = "```json\n{\"explicit_skills\": [{\"name\": \"Go\", \"weight\": 80, \"rationale\": \"r\"}]}\n```";
        let backend = ScriptedGenerator::new(vec![Ok(fenced.to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit[0].name, "Go");
    }

    #[tokio::test]
    async fn test_llm_extractor_rejects_malformed_json() {
        let backend = ScriptedGenerator::new(vec![Ok("not json at all".to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let err = extractor.extract("job text").await.unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_llm_extractor_demotes_missing_weights() {
        let backend = ScriptedGenerator::new(vec![Ok(r#"{
            "explicit_skills": [{"name": "Rust", "rationale": "partial output"}],
            "implicit_skills": [{"name": "mentoring", "rationale": "partial output"}]
        }"#
        .to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit[0].weight, REDUCED_EXPLICIT_WEIGHT);
        assert_eq!(analysis.implicit[0].weight, REDUCED_IMPLICIT_WEIGHT);
    }

    #[tokio::test]
    async fn test_llm_extractor_clamps_out_of_range_weights() {
        let backend = ScriptedGenerator::new(vec![Ok(r#"{
            "explicit_skills": [{"name": "Rust", "weight": 900, "rationale": "r"}],
            "implicit_skills": [{"name": "ops", "weight": -20, "rationale": "r"}]
        }"#
        .to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit[0].weight, 100.0);
        assert_eq!(analysis.implicit[0].weight, 0.0);
    }

    #[tokio::test]
    async fn test_llm_extractor_dedups_across_both_lists() {
        let backend = ScriptedGenerator::new(vec![Ok(r#"{
            "explicit_skills": [
                {"name": "Rust", "weight": 95, "rationale": "a"},
                {"name": "rust", "weight": 80, "rationale": "duplicate"}
            ],
            "implicit_skills": [{"name": "RUST", "weight": 60, "rationale": "again"}]
        }"#
        .to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit.len(), 1);
        assert!(analysis.implicit.is_empty());
        assert_eq!(analysis.explicit[0].weight, 95.0);
    }

    #[tokio::test]
    async fn test_llm_extractor_accepts_original_field_aliases() {
        // Some backends answer with skill/relevance/reason field names
        let backend = ScriptedGenerator::new(vec![Ok(r#"{
            "explicit_skills": [{"skill": "Kafka", "relevance": 88, "reason": "listed"}]
        }"#
        .to_string())]);
        let extractor = LlmSkillExtractor::new(backend);
        let analysis = extractor.extract("job text").await.unwrap();
        assert_eq!(analysis.explicit[0].name, "Kafka");
        assert_eq!(analysis.explicit[0].weight, 88.0);
        assert_eq!(analysis.explicit[0].rationale, "listed");
    }
}
