//! quizdeck CLI: take quizzes in the terminal and manage stored progress.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::settings::Toggle;
use commands::QuestionCap;

const DEFAULT_LOG_FILTER: &str = "quizdeck=info,quizdeck_core=info,quizdeck_store=info";

#[derive(Parser)]
#[command(name = "quizdeck", version, about = "Exam preparation quizzes with partial credit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take a quiz
    Take(commands::take::TakeArgs),

    /// Check a question file for problems
    Validate {
        /// Path to the question CSV
        #[arg(long)]
        questions: PathBuf,
    },

    /// Show progress over a question set
    Stats {
        /// Path to the question CSV (default: from config)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// User id to look up
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Clear stored progress
    Reset {
        /// Clear recorded answers only
        #[arg(long)]
        answers: bool,

        /// Clear the wrongly-answered list only
        #[arg(long)]
        wrong: bool,

        /// User id to reset
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show or change stored quiz settings
    Settings {
        /// Questions per quiz: a number, or "all"
        #[arg(long)]
        num: Option<QuestionCap>,

        /// Turn the countdown on or off
        #[arg(long, value_enum)]
        timer: Option<Toggle>,

        /// Countdown length in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Quiz title
        #[arg(long)]
        title: Option<String>,

        /// User id whose settings to change
        #[arg(long)]
        user: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and sample question file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take(args) => commands::take::execute(args).await,
        Commands::Validate { questions } => commands::validate::execute(questions),
        Commands::Stats {
            questions,
            user,
            config,
        } => commands::stats::execute(questions, user, config).await,
        Commands::Reset {
            answers,
            wrong,
            user,
            config,
        } => commands::reset::execute(answers, wrong, user, config).await,
        Commands::Settings {
            num,
            timer,
            minutes,
            title,
            user,
            config,
        } => commands::settings::execute(num, timer, minutes, title, user, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
