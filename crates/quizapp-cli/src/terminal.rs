//! Line-oriented terminal rendering of the quiz.

use std::io::Write;

use comfy_table::{Cell, Table};

use quizapp_core::model::{option_label, AnswerOption, OptionMark, Screen, SessionSummary};
use quizapp_core::traits::QuizView;

/// Renders controller commands as plain text on stdout. The countdown is
/// redrawn in place on stderr.
#[derive(Default)]
pub struct TerminalView {
    options: Vec<String>,
    timer_shown: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Terminate the in-place countdown line before printing anything else.
    fn end_timer_line(&mut self) {
        if self.timer_shown {
            eprintln!();
            self.timer_shown = false;
        }
    }
}

impl QuizView for TerminalView {
    fn show_loading(&mut self) {
        self.end_timer_line();
        println!("Loading questions...");
    }

    fn show_screen(&mut self, screen: Screen) {
        self.end_timer_line();
        match screen {
            Screen::Welcome => {
                println!();
                println!("=== Trivia Quiz ===");
                println!("Answer each question before the timer runs out.");
                println!("Commands: [s] start  [a-d] answer  [n] next  [p] play again  [h] home  [q] quit");
            }
            Screen::Active => println!(),
            Screen::Results => {
                println!("[p] play again  [h] home  [q] quit");
            }
        }
    }

    fn render_question(&mut self, prompt: &str, options: &[AnswerOption], index: usize, total: usize) {
        self.end_timer_line();
        println!();
        println!("Question {}/{}", index + 1, total);
        println!("{prompt}");
        self.options = options.iter().map(|o| o.display.clone()).collect();
        for (i, option) in self.options.iter().enumerate() {
            println!("  {}) {}", option_label(i), option);
        }
    }

    fn mark_option(&mut self, index: usize, mark: OptionMark) {
        self.end_timer_line();
        let text = self.options.get(index).map(String::as_str).unwrap_or("");
        match mark {
            OptionMark::Correct => println!("  [correct] {}) {}", option_label(index), text),
            OptionMark::Wrong => println!("  [wrong]   {}) {}", option_label(index), text),
            OptionMark::Neutral => {}
        }
    }

    fn set_score(&mut self, score: u32) {
        self.end_timer_line();
        println!("Score: {score}");
    }

    fn set_timer_display(&mut self, text: &str, urgent: bool) {
        let marker = if urgent { " (hurry!)" } else { "         " };
        eprint!("\r  Time left: {text}{marker}");
        let _ = std::io::stderr().flush();
        self.timer_shown = true;
    }

    fn set_progress(&mut self, percent: u32) {
        self.end_timer_line();
        const WIDTH: usize = 20;
        let filled = (percent as usize * WIDTH / 100).min(WIDTH);
        println!("[{}{}] {percent}%", "#".repeat(filled), "-".repeat(WIDTH - filled));
    }

    fn enable_next(&mut self, enabled: bool) {
        if enabled {
            self.end_timer_line();
            println!("Press [n] to continue.");
        }
    }

    fn show_summary(&mut self, summary: &SessionSummary) {
        self.end_timer_line();
        println!();
        println!("Quiz complete!");

        let mut table = Table::new();
        table.set_header(vec!["Final score", "Correct", "Wrong", "Accuracy"]);
        table.add_row(vec![
            Cell::new(summary.score),
            Cell::new(summary.correct),
            Cell::new(summary.wrong),
            Cell::new(format!("{}%", summary.accuracy)),
        ]);
        println!("{table}");
    }

    fn show_notice(&mut self, message: &str) {
        self.end_timer_line();
        println!();
        println!("*** {message} ***");
    }
}
