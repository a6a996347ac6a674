//! CSV question source.
//!
//! Loads question sets from CSV text, drops unusable rows with a warning,
//! and validates answer keys against the options they refer to.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::classifier::{blank_marker_count, unknown_choice_keys, QuestionClassifier, RawFields};
use crate::error::LoadError;
use crate::model::{AnswerKey, Question};

/// Header columns every question file must have.
pub const REQUIRED_HEADERS: [&str; 2] = ["QuestionNumber", "QuestionText"];

/// Read and parse a CSV question file.
pub fn load_questions(path: &Path) -> Result<Vec<Question>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_questions_str(&content)
}

/// Parse CSV text with the default classifier.
pub fn parse_questions_str(content: &str) -> Result<Vec<Question>, LoadError> {
    parse_questions_with(content, &QuestionClassifier::new())
}

/// Parse CSV text into questions.
///
/// Rows whose field count differs from the header, rows without question
/// text and rows repeating an earlier question text are skipped.
pub fn parse_questions_with(
    content: &str,
    classifier: &QuestionClassifier,
) -> Result<Vec<Question>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_HEADERS
        .iter()
        .filter(|h| !headers.iter().any(|found| found == **h))
        .map(|h| h.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingHeaders(missing));
    }

    let mut questions = Vec::new();
    let mut seen = HashSet::new();

    for (index, record) in reader.records().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping CSV line {line}: {e}");
                continue;
            }
        };
        if record.len() != headers.len() {
            tracing::warn!(
                "skipping CSV line {line}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
            continue;
        }

        let raw: RawFields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();

        let question = match classifier.classify(&raw) {
            Ok(q) => q,
            Err(e) => {
                tracing::warn!("skipping CSV line {line}: {e}");
                continue;
            }
        };
        if !seen.insert(question.text.clone()) {
            tracing::warn!(
                "skipping CSV line {line}: duplicate question text {:?}",
                question.text
            );
            continue;
        }
        questions.push(question);
    }

    if questions.is_empty() {
        return Err(LoadError::NoQuestions);
    }

    tracing::debug!("loaded {} questions", questions.len());
    Ok(questions)
}

/// A warning from question set validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The question's `QuestionNumber`.
    pub number: String,
    /// Warning message.
    pub message: String,
}

/// Validate a question set for answer keys that cannot be graded as intended.
pub fn validate_questions(questions: &[Question]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut warn = |q: &Question, message: String| {
        warnings.push(ValidationWarning {
            number: q.number.clone(),
            message,
        })
    };

    for q in questions {
        match &q.key {
            AnswerKey::MultipleChoice { options, correct } => {
                if correct.is_empty() {
                    warn(q, "multiple-choice question has no answer key".into());
                }
                let unknown = unknown_choice_keys(options, correct);
                if !unknown.is_empty() {
                    warn(
                        q,
                        format!("answer names missing options: {}", unknown.join(", ")),
                    );
                }
            }
            AnswerKey::TrueFalse { .. } => {}
            AnswerKey::TextInput { accepted } => {
                if accepted.is_empty() {
                    warn(q, "text-input question has no accepted answers".into());
                }
            }
            AnswerKey::FillBlank { blanks } => {
                let markers = blank_marker_count(&q.text);
                if blanks.len() != markers {
                    warn(
                        q,
                        format!(
                            "{} blank answers for {} ___ markers",
                            blanks.len(),
                            markers
                        ),
                    );
                }
            }
            AnswerKey::Sequence {
                options,
                correct_order,
            } => {
                let ids: BTreeSet<u32> = options.iter().map(|o| o.id).collect();
                let order: BTreeSet<u32> = correct_order.iter().copied().collect();
                if correct_order.is_empty() {
                    warn(q, "sequence question has no correct order".into());
                } else if ids != order || order.len() != correct_order.len() {
                    warn(
                        q,
                        format!(
                            "sequence order {correct_order:?} does not match option ids {:?}",
                            ids.iter().collect::<Vec<_>>()
                        ),
                    );
                }
            }
            AnswerKey::Matching {
                left_items,
                right_items,
                correct_matches,
            } => {
                if correct_matches.is_empty() {
                    warn(q, "matching question has no correct matches".into());
                }
                for (left, right) in correct_matches {
                    if !left_items.contains(left) {
                        warn(q, format!("match names unknown left item {left:?}"));
                    }
                    if !right_items.contains(right) {
                        warn(q, format!("match names unknown right item {right:?}"));
                    }
                }
            }
        }
    }

    warnings
}
