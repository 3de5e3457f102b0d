//! Core trait definitions for question sources and views.
//!
//! Sources are implemented in the `quizapp-source` crate; the terminal view
//! lives in `quizapp-cli`.

use async_trait::async_trait;

use crate::error::FetchError;
use crate::model::{AnswerOption, OptionMark, Question, Screen, SessionSummary};

// ---------------------------------------------------------------------------
// Question source trait
// ---------------------------------------------------------------------------

/// Something that supplies an ordered batch of questions.
///
/// A batch is atomic: either every question is usable or the call fails.
/// Text is returned exactly as received, without entity decoding.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Human-readable source name (e.g. "opentdb").
    fn name(&self) -> &str;

    /// Fetch one batch of questions.
    async fn fetch_questions(&self) -> Result<Vec<Question>, FetchError>;
}

// ---------------------------------------------------------------------------
// View trait
// ---------------------------------------------------------------------------

/// Render commands the controller issues to a presentation layer.
///
/// The controller never reads anything back from the view.
pub trait QuizView {
    /// Show the loading indicator while questions are being fetched.
    fn show_loading(&mut self);

    /// Hide every screen but `screen`.
    fn show_screen(&mut self, screen: Screen);

    /// Render a question. `index` is 0-based; `options` are already shuffled
    /// and decoded.
    fn render_question(&mut self, prompt: &str, options: &[AnswerOption], index: usize, total: usize);

    /// Change the mark on one displayed option.
    fn mark_option(&mut self, index: usize, mark: OptionMark);

    /// Update the running score.
    fn set_score(&mut self, score: u32);

    /// Update the countdown text (`MM:SS`).
    fn set_timer_display(&mut self, text: &str, urgent: bool);

    /// Update the progress indicator, in percent of questions already passed.
    fn set_progress(&mut self, percent: u32);

    /// Show or hide the "next" control.
    fn enable_next(&mut self, enabled: bool);

    /// Show the final results.
    fn show_summary(&mut self, summary: &SessionSummary);

    /// Present a blocking notice to the user.
    fn show_notice(&mut self, message: &str);
}
