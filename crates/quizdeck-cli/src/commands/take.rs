//! The `quizdeck take` command.

use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use quizdeck_core::model::{AnswerKey, QuizMode, Question};
use quizdeck_core::report::SessionReport;
use quizdeck_core::response::parse_answer;
use quizdeck_core::session::QuizSession;
use quizdeck_core::statistics::SubmissionResult;
use tokio::sync::mpsc;

use super::{load_config, open_session, questions_path, QuestionCap};

/// Typed on its own line to submit before the last question.
const SUBMIT_COMMAND: &str = ":submit";

#[derive(Args)]
pub struct TakeArgs {
    /// Path to the question CSV (default: from config)
    #[arg(long)]
    pub questions: Option<PathBuf>,

    /// Question pool: all, or retake (wrong, partial and unanswered only)
    #[arg(long, default_value = "retake")]
    pub mode: QuizMode,

    /// Questions in this quiz: a number, or "all" (not saved)
    #[arg(long)]
    pub num: Option<QuestionCap>,

    /// Run a countdown of this many minutes (not saved)
    #[arg(long)]
    pub timer: Option<u32>,

    /// User id to record progress under
    #[arg(long)]
    pub user: Option<String>,

    /// Seed for question order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON report of the submitted quiz
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: TakeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref(), args.user)?;
    let mut session = open_session(&config).await?.with_mode(args.mode);
    if let Some(seed) = args.seed {
        session = session.with_seed(seed);
    }

    let mut settings = session.settings().clone();
    if let Some(cap) = args.num {
        settings.num_questions = cap.limit();
    }
    if let Some(minutes) = args.timer {
        settings.enable_timer = minutes > 0;
        settings.time_limit_minutes = minutes;
    }
    let mut session = session.with_settings(settings);

    let path = questions_path(args.questions, &config);
    let total = session
        .load_questions(&path)
        .with_context(|| format!("failed to load questions from {}", path.display()))?;

    println!("{}", session.settings().quiz_title);
    if total == 0 {
        if session.is_mastered() {
            println!("Congratulations! You've mastered all questions!");
            println!("Run with --mode all to practice everything again.");
        } else {
            println!("No questions to show.");
        }
        session.flush().await;
        return Ok(());
    }
    println!(
        "{total} question(s) in {} mode. Press Enter to skip, type {SUBMIT_COMMAND} to finish early.",
        session.mode()
    );
    if let Some(countdown) = session.countdown() {
        println!("{countdown}");
    }

    play(&mut session, spawn_line_reader(), args.report.as_deref()).await
}

/// Run the quiz, print the outcome and write the report. Queued progress
/// reaches the store whether or not this succeeds.
async fn play(
    session: &mut QuizSession,
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    report_path: Option<&Path>,
) -> Result<()> {
    let outcome = run_and_summarize(session, lines, report_path).await;
    session.flush().await;
    outcome
}

async fn run_and_summarize(
    session: &mut QuizSession,
    lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
    report_path: Option<&Path>,
) -> Result<()> {
    let result = run_quiz(session, lines).await?;

    println!("\n{}", result.summary());
    println!(
        "Correct: {} | Partial: {} | Wrong: {} | Unanswered: {}",
        result.correct, result.partial, result.wrong, result.unanswered
    );
    if session.is_mastered() {
        println!("Congratulations! You've mastered all questions!");
    } else {
        println!("{} question(s) left to retake.", session.retake_set().len());
    }

    if let Some(report_path) = report_path {
        if let Some(report) = SessionReport::from_session(session) {
            report.save_json(report_path)?;
            println!("Report saved to {}", report_path.display());
        }
    }
    Ok(())
}

/// Ask each displayed question in turn until the end, an early submit, end
/// of input or the countdown running out.
async fn run_quiz(
    session: &mut QuizSession,
    mut lines: mpsc::UnboundedReceiver<std::io::Result<String>>,
) -> Result<SubmissionResult> {
    let timed = session.countdown().is_some();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;

    let total = session.len();
    'quiz: for index in 0..total {
        let question = session.question(index)?.clone();
        println!("\n{}", render_question(&question, index + 1, total));

        loop {
            tokio::select! {
                line = lines.recv() => {
                    let Some(line) = line else {
                        break 'quiz;
                    };
                    let line = line.context("failed to read answer")?;
                    let input = line.trim();
                    if input == SUBMIT_COMMAND {
                        break 'quiz;
                    }
                    if input.is_empty() {
                        println!("Skipped.");
                        break;
                    }
                    match parse_answer(&question, input) {
                        Some(response) => {
                            session.respond(index, response)?;
                            session.validate(index)?;
                            if let Some(feedback) = session.feedback(index) {
                                println!("{}", feedback.grade.message);
                                if let Some(explanation) = feedback.explanation {
                                    println!("{explanation}");
                                }
                            }
                            break;
                        }
                        None => println!("Could not read that answer. {}", input_hint(&question)),
                    }
                }
                _ = ticker.tick(), if timed => {
                    if let Some(result) = session.tick() {
                        println!("\nTime's up!");
                        return Ok(result);
                    }
                    if let Some(countdown) = session.countdown() {
                        let left = countdown.remaining();
                        if countdown.is_running() && left % 60 == 0 {
                            println!("{countdown}");
                        }
                    }
                }
            }
        }
    }

    match session.result() {
        Some(result) => Ok(*result),
        None => Ok(session.submit()?),
    }
}

/// Read stdin lines on a plain thread. A read still pending when the quiz
/// ends must not hold up runtime shutdown.
fn spawn_line_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Question text, its choices and a hint for how to answer.
pub fn render_question(question: &Question, position: usize, total: usize) -> String {
    let mut out = format!(
        "Question {position}/{total} {}\n{}\n",
        question.variant().indicator(),
        question.text
    );

    match &question.key {
        AnswerKey::MultipleChoice { options, .. } | AnswerKey::TrueFalse { options, .. } => {
            for option in options {
                out.push_str(&format!("  {}) {}\n", option.key, option.text));
            }
        }
        AnswerKey::Sequence { options, .. } => {
            for option in options {
                out.push_str(&format!("  [{}] {}\n", option.id, option.text));
            }
        }
        AnswerKey::Matching {
            left_items,
            right_items,
            ..
        } => {
            out.push_str(&format!("  Items:   {}\n", left_items.join(", ")));
            out.push_str(&format!("  Matches: {}\n", right_items.join(", ")));
        }
        AnswerKey::TextInput { .. } | AnswerKey::FillBlank { .. } => {}
    }

    out.push_str(&input_hint(question));
    out
}

fn input_hint(question: &Question) -> String {
    match &question.key {
        AnswerKey::MultipleChoice { .. } if question.is_multi_answer() => {
            "Select all that apply, e.g. A,C".to_string()
        }
        AnswerKey::MultipleChoice { .. } => "Enter an option letter, e.g. B".to_string(),
        AnswerKey::TrueFalse { .. } => "Enter true or false".to_string(),
        AnswerKey::TextInput { .. } => "Type your answer".to_string(),
        AnswerKey::FillBlank { blanks } => {
            format!("Fill {} blank(s), separated by |", blanks.len().max(1))
        }
        AnswerKey::Sequence { .. } => "Enter the item numbers in order, e.g. 3 1 2".to_string(),
        AnswerKey::Matching { .. } => "Pair items as item=match; item=match".to_string(),
    }
}
