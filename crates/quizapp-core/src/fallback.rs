//! The built-in question set used when the remote source is unavailable.

use crate::model::Question;

/// Notice shown when the fallback set replaces a failed fetch.
pub const FALLBACK_NOTICE: &str = "Failed to load questions from the trivia API. Using the built-in question set.";

/// The fixed five-question fallback set.
pub fn fallback_questions() -> Vec<Question> {
    vec![
        Question::new(
            "What is the capital of France?",
            "Paris",
            &["London", "Berlin", "Madrid"],
        ),
        Question::new(
            "Which planet is known as the Red Planet?",
            "Mars",
            &["Venus", "Jupiter", "Mercury"],
        ),
        Question::new(
            "What is the largest mammal on Earth?",
            "Blue Whale",
            &["African Elephant", "Giraffe", "Polar Bear"],
        ),
        Question::new(
            "Which programming language was created by James Gosling?",
            "Java",
            &["Python", "C++", "JavaScript"],
        ),
        Question::new(
            "In which year did World War II end?",
            "1945",
            &["1939", "1944", "1950"],
        ),
    ]
}
