use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Engine-level error taxonomy.
///
/// `ServiceUnavailable`, `Timeout` and `MalformedResponse` are recoverable:
/// the pipeline retries them with backoff and then degrades to the
/// deterministic fallback path. Only the `*Unavailable` variants (no path
/// left at all) and `InvalidPortfolio` (caller contract violation) surface
/// to the caller.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no skill extraction path available: {0}")]
    ExtractionUnavailable(String),

    #[error("no description rewrite path available: {0}")]
    OptimizationUnavailable(String),

    #[error("generative service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("generative call timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed generative response: {0}")]
    MalformedResponse(String),

    #[error("invalid portfolio: {0}")]
    InvalidPortfolio(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for EngineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Timeout(after) => EngineError::Timeout(after),
            LlmError::Parse(e) => EngineError::MalformedResponse(e.to_string()),
            LlmError::EmptyContent => {
                EngineError::MalformedResponse("service returned empty content".to_string())
            }
            LlmError::Http(_) | LlmError::Api { .. } | LlmError::RateLimited { .. } => {
                EngineError::ServiceUnavailable(err.to_string())
            }
        }
    }
}

impl EngineError {
    /// True for errors the pipeline may retry and then degrade on; false for
    /// contract violations and total-absence errors, which propagate as-is.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::ServiceUnavailable(_)
                | EngineError::Timeout(_)
                | EngineError::MalformedResponse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_timeout_maps_to_timeout() {
        let err: EngineError = LlmError::Timeout(Duration::from_secs(30)).into();
        assert!(matches!(err, EngineError::Timeout(d) if d == Duration::from_secs(30)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_llm_api_error_maps_to_service_unavailable() {
        let err: EngineError = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(err, EngineError::ServiceUnavailable(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_empty_content_maps_to_malformed_response() {
        let err: EngineError = LlmError::EmptyContent.into();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[test]
    fn test_invalid_portfolio_is_not_recoverable() {
        let err = EngineError::InvalidPortfolio("empty id".to_string());
        assert!(!err.is_recoverable());
    }
}
