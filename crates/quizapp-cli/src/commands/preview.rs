//! The `quizapp preview` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizapp_core::entities::decode_entities;
use quizapp_core::fallback::fallback_questions;
use quizapp_core::model::Question;
use quizapp_source::config::load_config_from;
use quizapp_source::{create_offline_source, create_source};

pub async fn execute(offline: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let source = if offline {
        create_offline_source()
    } else {
        create_source(&config.source)?
    };

    let questions = match source.fetch_questions().await {
        Ok(questions) if !questions.is_empty() => {
            println!("Fetched {} questions from {}.", questions.len(), source.name());
            questions
        }
        Ok(_) => {
            println!("Source returned no questions; using the built-in set.");
            fallback_questions()
        }
        Err(e) => {
            tracing::warn!(error = %e, "question fetch failed");
            println!("Fetch failed ({e}); using the built-in set.");
            fallback_questions()
        }
    };

    println!("{}", question_table(&questions));
    Ok(())
}

fn question_table(questions: &[Question]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Correct answer", "Other answers"]);

    for (i, q) in questions.iter().enumerate() {
        let others: Vec<String> = q
            .incorrect_answers
            .iter()
            .map(|a| decode_entities(a).into_owned())
            .collect();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(decode_entities(&q.prompt)),
            Cell::new(decode_entities(&q.correct_answer)),
            Cell::new(others.join(", ")),
        ]);
    }

    table
}
