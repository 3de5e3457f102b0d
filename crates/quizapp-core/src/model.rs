//! Core data model types for quizapp.
//!
//! These are the fundamental types the controller, the question sources, and
//! the views share: questions, answer options, session state, and the
//! session summary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of questions requested from the remote source per session.
pub const QUESTION_COUNT: u32 = 10;
/// Countdown budget for each question, in seconds.
pub const QUESTION_TIME_SECS: u32 = 30;
/// Points awarded for each correct answer.
pub const POINTS_PER_CORRECT: u32 = 10;
/// At or below this many remaining seconds the timer display turns urgent.
pub const URGENT_THRESHOLD_SECS: u32 = 5;
/// Options shown per question: one correct answer plus three incorrect ones.
pub const OPTION_COUNT: usize = 4;

/// Open Trivia DB category id ("Science: Computers").
pub const OPENTDB_CATEGORY: u32 = 18;
/// Open Trivia DB difficulty filter.
pub const OPENTDB_DIFFICULTY: &str = "medium";
/// Open Trivia DB question type filter.
pub const OPENTDB_TYPE: &str = "multiple";

/// A single multiple-choice question.
///
/// Text is kept exactly as the source delivered it, which for the remote API
/// means HTML-entity-encoded. Decode before display or comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// The question text.
    #[serde(rename = "question")]
    pub prompt: String,
    /// The one correct answer.
    pub correct_answer: String,
    /// The incorrect answers.
    pub incorrect_answers: Vec<String>,
}

impl Question {
    pub fn new(prompt: &str, correct_answer: &str, incorrect_answers: &[&str]) -> Self {
        Self {
            prompt: prompt.to_string(),
            correct_answer: correct_answer.to_string(),
            incorrect_answers: incorrect_answers.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// All answer texts, incorrect answers first, correct answer last.
    pub fn answers(&self) -> Vec<String> {
        let mut answers = self.incorrect_answers.clone();
        answers.push(self.correct_answer.clone());
        answers
    }
}

/// Visual state of a displayed answer option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionMark {
    #[default]
    Neutral,
    Correct,
    Wrong,
}

impl fmt::Display for OptionMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionMark::Neutral => write!(f, "neutral"),
            OptionMark::Correct => write!(f, "correct"),
            OptionMark::Wrong => write!(f, "wrong"),
        }
    }
}

/// One selectable choice for the active question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Raw answer text as delivered by the source.
    pub text: String,
    /// Entity-decoded text, used for display and grading.
    pub display: String,
    /// Current mark.
    #[serde(default)]
    pub mark: OptionMark,
}

/// Display label for the option at `index` ("A", "B", ...).
pub fn option_label(index: usize) -> char {
    (b'A' + (index % 26) as u8) as char
}

/// Which screen the view should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Welcome,
    Active,
    Results,
}

/// Phase of the quiz session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Active,
    Resolved,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Loading => write!(f, "loading"),
            Phase::Active => write!(f, "active"),
            Phase::Resolved => write!(f, "resolved"),
            Phase::Finished => write!(f, "finished"),
        }
    }
}

/// Tunable quiz parameters. Defaults are the named constants above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Countdown budget per question in seconds.
    #[serde(default = "default_question_time")]
    pub question_time_secs: u32,
    /// Points per correct answer.
    #[serde(default = "default_points")]
    pub points_per_correct: u32,
    /// Remaining seconds at which the timer display turns urgent.
    #[serde(default = "default_urgent_threshold")]
    pub urgent_threshold_secs: u32,
}

fn default_question_time() -> u32 {
    QUESTION_TIME_SECS
}
fn default_points() -> u32 {
    POINTS_PER_CORRECT
}
fn default_urgent_threshold() -> u32 {
    URGENT_THRESHOLD_SECS
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            question_time_secs: default_question_time(),
            points_per_correct: default_points(),
            urgent_threshold_secs: default_urgent_threshold(),
        }
    }
}

/// The single mutable aggregate of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Questions for this session, fixed once fetched.
    pub questions: Vec<Question>,
    /// 0-based index of the active question.
    pub current_index: usize,
    /// Accumulated points.
    pub score: u32,
    /// Questions answered correctly.
    pub correct_count: u32,
    /// Questions answered incorrectly or timed out.
    pub wrong_count: u32,
    /// Set once the active question is resolved.
    pub answer_locked: bool,
    /// Seconds left on the active question's countdown.
    pub time_remaining_secs: u32,
}

impl SessionState {
    pub fn new(questions: Vec<Question>, question_time_secs: u32) -> Self {
        Self {
            questions,
            current_index: 0,
            score: 0,
            correct_count: 0,
            wrong_count: 0,
            answer_locked: false,
            time_remaining_secs: question_time_secs,
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_index + 1 >= self.questions.len()
    }

    /// Number of questions resolved so far.
    pub fn resolved_count(&self) -> u32 {
        self.correct_count + self.wrong_count
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::new(
            self.score,
            self.correct_count,
            self.wrong_count,
            self.questions.len(),
        )
    }
}

/// Final results of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub correct: u32,
    pub wrong: u32,
    pub total: usize,
    /// Percentage of questions answered correctly, rounded.
    pub accuracy: u32,
}

impl SessionSummary {
    pub fn new(score: u32, correct: u32, wrong: u32, total: usize) -> Self {
        Self {
            score,
            correct,
            wrong,
            total,
            accuracy: accuracy(correct, total),
        }
    }
}

/// `round(correct / total * 100)`, or 0 when there are no questions.
pub fn accuracy(correct: u32, total: usize) -> u32 {
    percent(correct as usize, total)
}

/// `round(part / whole * 100)`, or 0 when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}
