//! Mock source for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizapp_core::error::FetchError;
use quizapp_core::model::Question;
use quizapp_core::traits::QuestionSource;

/// What the next fetch should produce.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Questions(Vec<Question>),
    NetworkError(String),
    Empty,
}

/// A mock question source for exercising the controller without HTTP.
///
/// Outcomes are consumed in order; the last one repeats once the queue is
/// down to a single entry.
pub struct MockSource {
    outcomes: Mutex<Vec<MockOutcome>>,
    /// Number of calls made.
    call_count: AtomicU32,
}

impl MockSource {
    /// Create a mock that plays back `outcomes` in order.
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a mock that always returns the same questions.
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self::new(vec![MockOutcome::Questions(questions)])
    }

    /// Create a mock whose every fetch fails with a network error.
    pub fn failing() -> Self {
        Self::new(vec![MockOutcome::NetworkError("connection refused".into())])
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    fn next_outcome(&self) -> MockOutcome {
        let mut outcomes = self
            .outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match outcomes.len() {
            0 => MockOutcome::Empty,
            1 => outcomes[0].clone(),
            _ => outcomes.remove(0),
        }
    }
}

#[async_trait]
impl QuestionSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);

        match self.next_outcome() {
            MockOutcome::Questions(questions) => Ok(questions),
            MockOutcome::NetworkError(message) => Err(FetchError::Network(message)),
            MockOutcome::Empty => Err(FetchError::Empty),
        }
    }
}
