use thiserror::Error;

/// Why one remote classification attempt produced no result.
///
/// The orchestrator matches this exhaustively; every variant leads to
/// the local fallback path, but the variants are kept distinct for
/// logging and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationFailure {
    /// The upstream model is still being loaded (HTTP 503 with the
    /// dedicated error body).
    #[error("classifier model is still loading")]
    ModelLoading,

    /// The request exceeded its wall-clock budget, either client-side
    /// or reported by the server as HTTP 408.
    #[error("classification request timed out")]
    Timeout,

    /// Any other non-2xx HTTP status.
    #[error("classifier returned HTTP {status}")]
    Upstream {
        /// The HTTP status code returned by the server.
        status: u16,
    },

    /// The request never completed: connection refused, DNS failure,
    /// or the connection dropped mid-response.
    #[error("classifier transport error: {0}")]
    Transport(String),

    /// A 2xx response whose body did not contain a valid priority.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),
}

impl ClassificationFailure {
    /// Short stable name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ModelLoading => "model_loading",
            Self::Timeout => "timeout",
            Self::Upstream { .. } => "upstream",
            Self::Transport(_) => "transport",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        assert_eq!(
            ClassificationFailure::ModelLoading.to_string(),
            "classifier model is still loading"
        );
        assert_eq!(
            ClassificationFailure::Upstream { status: 502 }.to_string(),
            "classifier returned HTTP 502"
        );
    }

    #[test]
    fn test_failure_kind_names() {
        assert_eq!(ClassificationFailure::Timeout.kind(), "timeout");
        assert_eq!(
            ClassificationFailure::Transport("connection refused".to_owned()).kind(),
            "transport"
        );
        assert_eq!(
            ClassificationFailure::MalformedResponse("bad body".to_owned()).kind(),
            "malformed_response"
        );
    }
}
