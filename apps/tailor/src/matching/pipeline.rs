//! Match pipeline — sequences the full run over one job description and a
//! portfolio.
//!
//! Flow: validate portfolio → extract skills → rank all projects →
//!       optimize descriptions for the top-K → assemble MatchReport.
//!
//! This module owns the retry/fallback policy toward the generative
//! backend: transport-level retries live in the LLM client; malformed
//! responses are retried here with backoff; on exhaustion the run degrades
//! to the deterministic paths (vocabulary extraction, identity
//! optimization) so it always terminates with a complete report.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::config::EngineOptions;
use crate::errors::EngineError;
use crate::llm_client::TextGenerator;
use crate::matching::extractor::{
    LlmSkillExtractor, SkillExtractor, Vocabulary, VocabularySkillExtractor,
};
use crate::matching::optimizer::DescriptionOptimizer;
use crate::matching::ranker::{rank, validate_portfolio};
use crate::models::project::Project;
use crate::models::report::MatchReport;
use crate::models::skill::SkillAnalysis;

/// Drives one match run. Holds no per-run state — each `run` call is a pure
/// function of its inputs plus the backend's responses.
pub struct MatchPipeline {
    backend: Option<Arc<dyn TextGenerator>>,
    vocabulary: Option<Vocabulary>,
    options: EngineOptions,
}

impl MatchPipeline {
    pub fn new(
        backend: Option<Arc<dyn TextGenerator>>,
        vocabulary: Option<Vocabulary>,
        options: EngineOptions,
    ) -> Self {
        Self {
            backend,
            vocabulary,
            options,
        }
    }

    /// Runs the full pipeline and assembles the report.
    pub async fn run(
        &self,
        job_text: &str,
        projects: &[Project],
    ) -> Result<MatchReport, EngineError> {
        // Step 1: caller contract — fail fast, never retried
        validate_portfolio(projects)?;

        // Step 2: skill extraction (generative first, vocabulary fallback)
        let analysis = self.extract_skills(job_text).await?;
        info!(
            "Extracted {} explicit / {} implicit skills",
            analysis.explicit.len(),
            analysis.implicit.len()
        );

        // Step 3: rank the full portfolio — length-preserving
        let ranked = rank(&analysis, projects, &self.options)?;
        info!("Ranked {} projects", ranked.len());

        // Step 4: optimize descriptions for the top-K ranked projects
        let optimizer = DescriptionOptimizer::new(self.backend.clone(), self.options.clone());
        let k = self
            .options
            .top_k
            .unwrap_or(ranked.len())
            .min(ranked.len());
        let by_id: HashMap<&str, &Project> =
            projects.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut optimized = Vec::with_capacity(k);
        for scored in ranked.iter().take(k) {
            if let Some(project) = by_id.get(scored.project_id.as_str()) {
                optimized.push(
                    optimizer
                        .optimize(&analysis, project, self.options.optimization_attempts)
                        .await,
                );
            }
        }
        info!("Optimized {} description(s)", optimized.len());

        // Step 5: assemble — immutable after this point
        Ok(MatchReport {
            generated_at: Utc::now(),
            skill_analysis: analysis,
            ranked_projects: ranked,
            optimized_descriptions: optimized,
        })
    }

    /// Generative extraction with bounded retries on malformed responses
    /// (transport errors are already retried inside the client), then the
    /// vocabulary fallback. `ExtractionUnavailable` only when no path is
    /// left at all.
    async fn extract_skills(&self, job_text: &str) -> Result<SkillAnalysis, EngineError> {
        if let Some(backend) = &self.backend {
            let extractor = LlmSkillExtractor::new(Arc::clone(backend));
            let mut exhausted: Option<EngineError> = None;

            for attempt in 1..=self.options.max_attempts {
                match extractor.extract(job_text).await {
                    Ok(analysis) => return Ok(analysis),
                    Err(e @ EngineError::MalformedResponse(_))
                        if attempt < self.options.max_attempts =>
                    {
                        let delay = backoff_delay(attempt);
                        warn!(
                            "Skill extraction attempt {attempt}/{} returned a malformed \
                             response ({e}); retrying in {delay:?}",
                            self.options.max_attempts
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) if e.is_recoverable() => {
                        exhausted = Some(e);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }

            if let Some(e) = exhausted {
                warn!("Generative skill extraction exhausted ({e}); degrading to vocabulary path");
            }
        }

        match &self.vocabulary {
            Some(vocabulary) => {
                VocabularySkillExtractor::new(vocabulary.clone())
                    .extract(job_text)
                    .await
            }
            None if self.backend.is_some() => Err(EngineError::ExtractionUnavailable(
                "generative extraction exhausted and no vocabulary configured".to_string(),
            )),
            None => Err(EngineError::ExtractionUnavailable(
                "neither a generative backend nor a vocabulary is configured".to_string(),
            )),
        }
    }
}

/// Exponential backoff: 1s, 2s, 4s, ...
fn backoff_delay(failed_attempts: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (failed_attempts - 1)))
}
