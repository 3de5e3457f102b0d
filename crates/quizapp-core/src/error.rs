//! Error types.
//!
//! `FetchError` covers every way a question source can fail. It lives here
//! so the controller can log and classify failures before substituting the
//! fallback set, without depending on any particular source implementation.

use thiserror::Error;

/// Errors that can occur while fetching a question batch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The server answered with a non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    Status { status: u16, message: String },

    /// The trivia API reported a failure in its response code.
    #[error("trivia API response code {code}: {message}")]
    Api { code: u8, message: String },

    /// The response body could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The response contained no questions.
    #[error("no questions returned")]
    Empty,
}

impl FetchError {
    /// Returns `true` if the source could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Timeout(_))
    }
}

/// Errors raised by the quiz session controller.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Session initialization failed after the question set was obtained.
    #[error("quiz could not be started: {0}")]
    Startup(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_classification() {
        assert!(FetchError::Network("refused".into()).is_unreachable());
        assert!(FetchError::Timeout(15).is_unreachable());
        assert!(!FetchError::Empty.is_unreachable());
        assert!(!FetchError::Status {
            status: 500,
            message: String::new()
        }
        .is_unreachable());
    }

    #[test]
    fn display_messages() {
        assert_eq!(FetchError::Empty.to_string(), "no questions returned");
        assert_eq!(
            QuizError::Startup("no questions".into()).to_string(),
            "quiz could not be started: no questions"
        );
    }
}
