//! Grading rules for every question variant.
//!
//! Grading is pure and never fails: a missing answer key grades as wrong, a
//! missing or empty response grades as unanswered, and a response of the
//! wrong shape grades as wrong.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{AnswerKey, Question, Verdict};
use crate::response::Response;

/// Detailed grading outcome, used for feedback display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub verdict: Verdict,
    /// Parts answered correctly (options, blanks, positions, matches).
    pub correct_parts: usize,
    /// Parts in the answer key.
    pub total_parts: usize,
    /// Sequence score including adjacent-position leniency, 0..=100.
    #[serde(default)]
    pub percent: Option<u32>,
    /// Human-readable feedback line.
    pub message: String,
}

impl Grade {
    fn new(verdict: Verdict, correct_parts: usize, total_parts: usize, message: String) -> Self {
        Self {
            verdict,
            correct_parts,
            total_parts,
            percent: None,
            message,
        }
    }

    fn unanswered(message: &str) -> Self {
        Self::new(Verdict::Unanswered, 0, 0, message.to_string())
    }

    fn mismatched(response: &Response) -> Self {
        tracing::debug!("{} response graded against a different question type", response.kind());
        Self::new(
            Verdict::Wrong,
            0,
            0,
            "Wrong! The answer does not fit this question type.".to_string(),
        )
    }

    /// Fraction of the answer key that was right. Display only; the verdict
    /// is what counts toward scores and progress.
    pub fn credit(&self) -> f64 {
        if self.total_parts == 0 {
            self.verdict.credit()
        } else {
            self.correct_parts as f64 / self.total_parts as f64
        }
    }
}

/// Stateless grading engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradingEngine;

impl GradingEngine {
    pub fn new() -> Self {
        Self
    }

    /// Grade a response and return only the verdict.
    pub fn grade(&self, question: &Question, response: Option<&Response>) -> Verdict {
        self.evaluate(question, response).verdict
    }

    /// Grade a response with feedback details.
    pub fn evaluate(&self, question: &Question, response: Option<&Response>) -> Grade {
        let Some(response) = response.filter(|r| !r.is_empty()) else {
            return Grade::unanswered(unanswered_prompt(&question.key));
        };

        match (&question.key, response) {
            (AnswerKey::MultipleChoice { correct, .. }, Response::Choices(selected)) => {
                grade_choices(correct, selected)
            }
            (AnswerKey::TrueFalse { correct, .. }, Response::Boolean(picked)) => {
                grade_true_false(*correct, *picked)
            }
            (AnswerKey::TextInput { accepted }, Response::Text(text)) => {
                grade_text(accepted, text)
            }
            (AnswerKey::FillBlank { blanks }, Response::Blanks(filled)) => {
                grade_blanks(blanks, filled)
            }
            (AnswerKey::Sequence { correct_order, .. }, Response::Order(order)) => {
                grade_sequence(correct_order, order)
            }
            (AnswerKey::Matching { correct_matches, .. }, Response::Matches(placed)) => {
                let correct_count = placed
                    .iter()
                    .filter(|(item, target)| correct_matches.get(*item) == Some(*target))
                    .count();
                grade_matches(correct_count, placed.len(), correct_matches.len())
            }
            (_, other) => Grade::mismatched(other),
        }
    }
}

fn unanswered_prompt(key: &AnswerKey) -> &'static str {
    match key {
        AnswerKey::MultipleChoice { .. } => "Please select an answer.",
        AnswerKey::TrueFalse { .. } => "Please select True or False.",
        AnswerKey::TextInput { .. } => "Please enter an answer.",
        AnswerKey::FillBlank { .. } => "Please fill in the blanks.",
        AnswerKey::Matching { .. } => "Please match the items.",
        AnswerKey::Sequence { .. } => "Please arrange the items in order.",
    }
}

/// Lowercase, trim and drop everything but word characters and whitespace.
pub fn normalize_text(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

fn grade_choices(correct: &BTreeSet<String>, selected: &BTreeSet<String>) -> Grade {
    let total = correct.len();
    let correct_selected = selected.intersection(correct).count();

    if selected == correct {
        return Grade::new(Verdict::Correct, total, total, "Correct!".to_string());
    }

    let listed = correct.iter().cloned().collect::<Vec<_>>().join(", ");
    if total > 1 && correct_selected > 0 {
        Grade::new(
            Verdict::Partial,
            correct_selected,
            total,
            format!("Partial Credit! {correct_selected}/{total} correct. Correct answers: {listed}"),
        )
    } else {
        let plural = if total > 1 { "s" } else { "" };
        Grade::new(
            Verdict::Wrong,
            correct_selected,
            total,
            format!("Wrong! Correct answer{plural}: {listed}"),
        )
    }
}

fn grade_true_false(correct: bool, picked: bool) -> Grade {
    if correct == picked {
        Grade::new(Verdict::Correct, 1, 1, "Correct!".to_string())
    } else {
        let expected = if correct { "True" } else { "False" };
        Grade::new(
            Verdict::Wrong,
            0,
            1,
            format!("Wrong! Correct answer: {expected}"),
        )
    }
}

fn grade_text(accepted: &[String], text: &str) -> Grade {
    let answer = normalize_text(text);
    if accepted.iter().any(|a| normalize_text(a) == answer) {
        Grade::new(Verdict::Correct, 1, 1, "Correct!".to_string())
    } else {
        Grade::new(
            Verdict::Wrong,
            0,
            1,
            format!("Wrong! Possible answers: {}", accepted.join(", ")),
        )
    }
}

fn grade_blanks(blanks: &[String], filled: &[String]) -> Grade {
    let total = blanks.len();
    let correct_count = blanks
        .iter()
        .zip(filled)
        .filter(|(expected, given)| {
            !given.trim().is_empty() && normalize_text(expected) == normalize_text(given)
        })
        .count();
    let supplied = filled.iter().filter(|f| !f.trim().is_empty()).count();

    if total > 0 && correct_count == total && supplied == total {
        Grade::new(Verdict::Correct, correct_count, total, "Correct!".to_string())
    } else if correct_count > 0 {
        Grade::new(
            Verdict::Partial,
            correct_count,
            total,
            format!("Partial Credit! {correct_count}/{total} correct."),
        )
    } else {
        Grade::new(
            Verdict::Wrong,
            0,
            total,
            format!("Wrong! Correct answers: {}", blanks.join(", ")),
        )
    }
}

fn grade_sequence(correct_order: &[u32], order: &[u32]) -> Grade {
    let total = correct_order.len();
    let mut correct_positions = 0usize;
    let mut leniency = 0.0f64;

    for (position, id) in order.iter().enumerate() {
        match correct_order.iter().position(|c| c == id) {
            Some(expected) if expected == position => correct_positions += 1,
            Some(expected) if expected.abs_diff(position) == 1 => leniency += 0.5,
            _ => {}
        }
    }

    if total == 0 {
        return Grade::new(Verdict::Wrong, 0, 0, "Incorrect sequence. Try again!".to_string());
    }

    let percent = (((correct_positions as f64 + leniency) / total as f64) * 100.0).round() as u32;
    let mut grade = if correct_positions == total {
        Grade::new(
            Verdict::Correct,
            correct_positions,
            total,
            "Perfect! Correct sequence!".to_string(),
        )
    } else if leniency > 0.0 || correct_positions > 0 {
        Grade::new(
            Verdict::Partial,
            correct_positions,
            total,
            format!(
                "Partial Credit: {correct_positions}/{total} in exact position ({percent}% score)"
            ),
        )
    } else {
        Grade::new(
            Verdict::Wrong,
            0,
            total,
            "Incorrect sequence. Try again!".to_string(),
        )
    };
    grade.percent = Some(percent.min(100));
    grade
}

fn grade_matches(correct_count: usize, placed: usize, total: usize) -> Grade {
    if total > 0 && correct_count == total && placed == total {
        Grade::new(Verdict::Correct, correct_count, total, "Correct!".to_string())
    } else if correct_count > 0 {
        Grade::new(
            Verdict::Partial,
            correct_count,
            total,
            format!("Partial Credit! {correct_count}/{total} correct matches."),
        )
    } else {
        Grade::new(
            Verdict::Wrong,
            0,
            total,
            "Wrong! Check the correct matches.".to_string(),
        )
    }
}
