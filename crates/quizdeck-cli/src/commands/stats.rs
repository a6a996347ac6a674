//! The `quizdeck stats` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use super::{load_config, open_session, questions_path};

pub async fn execute(
    questions: Option<PathBuf>,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref(), user)?;
    let mut session = open_session(&config).await?;

    let path = questions_path(questions, &config);
    session
        .load_questions(&path)
        .with_context(|| format!("failed to load questions from {}", path.display()))?;

    let stats = session.stats();
    let retake = session.retake_set().len();

    let mut table = Table::new();
    table.set_header(vec!["Questions", "Correct", "Wrong / Partial", "Unanswered", "To Retake"]);
    table.add_row(vec![
        Cell::new(stats.total()),
        Cell::new(stats.correct),
        Cell::new(stats.wrong),
        Cell::new(stats.unanswered),
        Cell::new(retake),
    ]);

    println!("{}", session.settings().quiz_title);
    println!("{table}");

    if session.is_mastered() {
        println!("Congratulations! You've mastered all questions!");
    }

    Ok(())
}
