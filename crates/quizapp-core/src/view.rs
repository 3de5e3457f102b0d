//! View implementations that need no terminal.

use crate::model::{AnswerOption, OptionMark, Screen, SessionSummary};
use crate::traits::QuizView;

/// One render command received by a [`RecordingView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Loading,
    Screen(Screen),
    Question {
        prompt: String,
        options: Vec<String>,
        index: usize,
        total: usize,
    },
    Mark {
        index: usize,
        mark: OptionMark,
    },
    Score(u32),
    Timer {
        text: String,
        urgent: bool,
    },
    Progress(u32),
    Next(bool),
    Summary(SessionSummary),
    Notice(String),
}

/// A view that records every command, for driving the controller headless.
#[derive(Debug, Default)]
pub struct RecordingView {
    events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ViewEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn notices(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn marks(&self) -> Vec<(usize, OptionMark)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Mark { index, mark } => Some((*index, *mark)),
                _ => None,
            })
            .collect()
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Summary(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    /// The most recent timer display.
    pub fn last_timer(&self) -> Option<(&str, bool)> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Timer { text, urgent } => Some((text.as_str(), *urgent)),
            _ => None,
        })
    }

    /// The most recent screen switch.
    pub fn last_screen(&self) -> Option<Screen> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Screen(s) => Some(*s),
            _ => None,
        })
    }

    /// The most recently rendered prompt.
    pub fn last_prompt(&self) -> Option<&str> {
        self.events.iter().rev().find_map(|e| match e {
            ViewEvent::Question { prompt, .. } => Some(prompt.as_str()),
            _ => None,
        })
    }
}

impl QuizView for RecordingView {
    fn show_loading(&mut self) {
        self.events.push(ViewEvent::Loading);
    }

    fn show_screen(&mut self, screen: Screen) {
        self.events.push(ViewEvent::Screen(screen));
    }

    fn render_question(&mut self, prompt: &str, options: &[AnswerOption], index: usize, total: usize) {
        self.events.push(ViewEvent::Question {
            prompt: prompt.to_string(),
            options: options.iter().map(|o| o.display.clone()).collect(),
            index,
            total,
        });
    }

    fn mark_option(&mut self, index: usize, mark: OptionMark) {
        self.events.push(ViewEvent::Mark { index, mark });
    }

    fn set_score(&mut self, score: u32) {
        self.events.push(ViewEvent::Score(score));
    }

    fn set_timer_display(&mut self, text: &str, urgent: bool) {
        self.events.push(ViewEvent::Timer {
            text: text.to_string(),
            urgent,
        });
    }

    fn set_progress(&mut self, percent: u32) {
        self.events.push(ViewEvent::Progress(percent));
    }

    fn enable_next(&mut self, enabled: bool) {
        self.events.push(ViewEvent::Next(enabled));
    }

    fn show_summary(&mut self, summary: &SessionSummary) {
        self.events.push(ViewEvent::Summary(*summary));
    }

    fn show_notice(&mut self, message: &str) {
        self.events.push(ViewEvent::Notice(message.to_string()));
    }
}
