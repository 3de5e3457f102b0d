//! The `quizapp play` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use quizapp_core::model::Screen;
use quizapp_core::timer::TokioTicker;
use quizapp_core::traits::{QuestionSource, QuizView};
use quizapp_core::{Action, QuizController};
use quizapp_source::config::load_config_from;
use quizapp_source::{create_offline_source, create_source};

use crate::terminal::TerminalView;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// Pick the option at this display index.
    Choose(usize),
    Action(Action),
    Quit,
}

fn parse_input(line: &str) -> Option<Input> {
    let input = match line.trim().to_ascii_lowercase().as_str() {
        "a" | "1" => Input::Choose(0),
        "b" | "2" => Input::Choose(1),
        "c" | "3" => Input::Choose(2),
        "d" | "4" => Input::Choose(3),
        "s" | "start" => Input::Action(Action::Start),
        "n" | "next" => Input::Action(Action::Next),
        "p" | "again" => Input::Action(Action::PlayAgain),
        "h" | "home" => Input::Action(Action::Home),
        "q" | "quit" | "exit" => Input::Quit,
        _ => return None,
    };
    Some(input)
}

pub async fn execute(offline: bool, seed: Option<u64>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let source: Arc<dyn QuestionSource> = if offline {
        Arc::from(create_offline_source())
    } else {
        Arc::from(create_source(&config.source)?)
    };
    tracing::debug!(source = source.name(), "using question source");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let ticker = TokioTicker::new(tx);

    let mut controller =
        QuizController::new(source, TerminalView::new(), Box::new(ticker)).with_settings(config.quiz);
    if let Some(seed) = seed {
        controller = controller.with_seed(seed);
    }
    controller.view_mut().show_screen(Screen::Welcome);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            Some(action) = rx.recv() => controller.dispatch(action).await,
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read input")? else {
                    break;
                };
                match parse_input(&line) {
                    Some(Input::Quit) => break,
                    Some(Input::Action(action)) => controller.dispatch(action).await,
                    Some(Input::Choose(index)) => match controller.option_text(index) {
                        Some(text) => {
                            let text = text.to_string();
                            controller.dispatch(Action::Select(text)).await;
                        }
                        None => eprintln!("No option {} right now.", index + 1),
                    },
                    None if line.trim().is_empty() => {}
                    None => eprintln!("Unknown command: {}", line.trim()),
                }
            }
        }
    }

    tracing::debug!(phase = %controller.phase(), "input closed, exiting");
    Ok(())
}
