// The matching-and-optimization engine.
// Implements: text normalization, skill extraction, relevance scoring,
// portfolio ranking, and description optimization.
// All generative calls go through llm_client — no direct API calls here.

pub mod extractor;
pub mod normalizer;
pub mod optimizer;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
pub mod scorer;
