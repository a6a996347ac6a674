//! The `quizdeck reset` command.

use std::path::PathBuf;

use anyhow::Result;

use super::{load_config, open_session};

/// Clear stored progress. With neither flag set, both lists are cleared.
pub async fn execute(
    answers: bool,
    wrong: bool,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref(), user)?;
    let mut session = open_session(&config).await?;

    let (answers, wrong) = if answers || wrong {
        (answers, wrong)
    } else {
        (true, true)
    };

    if answers {
        session.clear_session_answers();
        println!("Cleared recorded answers.");
    }
    if wrong {
        session.clear_wrongly_answered();
        println!("Cleared wrongly-answered list.");
    }

    session.flush().await;
    Ok(())
}
