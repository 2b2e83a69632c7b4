use std::time::Duration;

use anyhow::Result;

/// Process configuration loaded from the environment (`.env` supported).
/// The API key is optional — without it the engine runs on its
/// deterministic paths only.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// The recognized engine knobs, passed explicitly into the pipeline at
/// construction. No engine module reads the environment directly.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Per-call time bound on generative requests.
    pub timeout: Duration,
    /// Bounded retry attempts toward the generative service.
    pub max_attempts: u32,
    /// Rewrite candidates requested per project description.
    pub optimization_attempts: u32,
    /// How many top-ranked projects get optimized descriptions. None = all.
    pub top_k: Option<usize>,
    /// Score bonus applied when at least one explicit skill matches exactly.
    pub explicit_bonus: f32,
    /// Allowed candidate length deviation (ratio of the original length)
    /// before the length penalty kicks in.
    pub max_length_ratio: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            max_attempts: 3,
            optimization_attempts: 3,
            top_k: None,
            explicit_bonus: 10.0,
            max_length_ratio: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_options_defaults() {
        let options = EngineOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(60));
        assert_eq!(options.max_attempts, 3);
        assert_eq!(options.optimization_attempts, 3);
        assert!(options.top_k.is_none());
        assert_eq!(options.explicit_bonus, 10.0);
        assert_eq!(options.max_length_ratio, 0.5);
    }
}
