//! A source that serves a fixed, in-memory question list.

use async_trait::async_trait;

use quizapp_core::error::FetchError;
use quizapp_core::fallback::fallback_questions;
use quizapp_core::model::Question;
use quizapp_core::traits::QuestionSource;

/// Serves the same questions on every fetch. Used for offline play.
pub struct StaticSource {
    questions: Vec<Question>,
}

impl StaticSource {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// A source serving the built-in fallback set.
    pub fn fallback() -> Self {
        Self::new(fallback_questions())
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        if self.questions.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(self.questions.clone())
    }
}
