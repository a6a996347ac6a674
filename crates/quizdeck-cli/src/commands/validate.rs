//! The `quizdeck validate` command.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(questions_path: PathBuf) -> Result<()> {
    let questions = quizdeck_core::parser::load_questions(&questions_path)
        .with_context(|| format!("failed to load questions from {}", questions_path.display()))?;

    println!(
        "Question set: {} ({} questions)",
        questions_path.display(),
        questions.len()
    );

    let mut by_variant: BTreeMap<String, usize> = BTreeMap::new();
    for q in &questions {
        *by_variant.entry(q.variant().to_string()).or_default() += 1;
    }
    for (variant, count) in &by_variant {
        println!("  {variant}: {count}");
    }

    let warnings = quizdeck_core::parser::validate_questions(&questions);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.number, w.message);
    }

    if warnings.is_empty() {
        println!("All questions valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
