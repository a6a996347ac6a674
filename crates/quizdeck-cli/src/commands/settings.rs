//! The `quizdeck settings` command.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::ValueEnum;
use quizdeck_core::model::Settings;

use super::{load_config, open_session, QuestionCap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

/// Print the stored settings, or change them when any flag is given.
pub async fn execute(
    num: Option<QuestionCap>,
    timer: Option<Toggle>,
    minutes: Option<u32>,
    title: Option<String>,
    user: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref(), user)?;
    let mut session = open_session(&config).await?;

    let mut settings = session.settings().clone();
    let changed = num.is_some() || timer.is_some() || minutes.is_some() || title.is_some();

    if let Some(cap) = num {
        settings.num_questions = cap.limit();
    }
    if let Some(toggle) = timer {
        settings.enable_timer = toggle == Toggle::On;
    }
    if let Some(minutes) = minutes {
        if minutes == 0 {
            bail!("time limit must be at least one minute");
        }
        settings.time_limit_minutes = minutes;
    }
    if let Some(title) = title {
        let title = title.trim();
        if title.is_empty() {
            bail!("quiz title cannot be empty");
        }
        settings.quiz_title = title.to_string();
    }

    if changed {
        session.update_settings(settings.clone());
        session.flush().await;
        println!("Settings saved.");
    }
    print!("{}", describe(&settings));

    Ok(())
}

fn describe(settings: &Settings) -> String {
    let questions = match settings.question_limit() {
        Some(n) => n.to_string(),
        None => "all".to_string(),
    };
    let timer = if settings.enable_timer {
        format!("on ({} min)", settings.time_limit_minutes)
    } else {
        "off".to_string()
    };
    format!(
        "Title:     {}\nQuestions: {questions}\nTimer:     {timer}\n",
        settings.quiz_title
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_defaults() {
        let out = describe(&Settings::default());
        assert!(out.contains("Title:     Enhanced Exam Preparation Quiz"));
        assert!(out.contains("Questions: all"));
        assert!(out.contains("Timer:     off"));
    }

    #[test]
    fn describes_timer_and_cap() {
        let settings = Settings {
            num_questions: Some(12),
            enable_timer: true,
            time_limit_minutes: 20,
            ..Settings::default()
        };
        let out = describe(&settings);
        assert!(out.contains("Questions: 12"));
        assert!(out.contains("Timer:     on (20 min)"));
    }
}
