//! Aggregate counts and submission scoring.

use serde::{Deserialize, Serialize};

use crate::model::Verdict;

/// Progress counts over a question set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizStats {
    pub correct: usize,
    /// Wrong or partial, or still flagged for retake.
    pub wrong: usize,
    pub unanswered: usize,
}

impl QuizStats {
    pub fn total(&self) -> usize {
        self.correct + self.wrong + self.unanswered
    }
}

/// Outcome of submitting a quiz.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionResult {
    pub correct: usize,
    pub partial: usize,
    pub wrong: usize,
    pub unanswered: usize,
    /// `correct + 0.5 * partial`.
    pub score: f64,
    /// Number of displayed questions.
    pub total: usize,
    /// Rounded `score / total * 100`; zero for an empty quiz.
    pub percentage: u32,
}

impl SubmissionResult {
    /// One-line score summary, e.g. `Your Score: 1.5/3 (50%)`.
    pub fn summary(&self) -> String {
        format!(
            "Your Score: {}/{} ({}%)",
            format_score(self.score),
            self.total,
            self.percentage
        )
    }
}

/// Score a submitted quiz from per-question verdicts in display order.
pub fn score_verdicts<I>(verdicts: I) -> SubmissionResult
where
    I: IntoIterator<Item = Verdict>,
{
    let mut result = SubmissionResult::default();
    for verdict in verdicts {
        result.total += 1;
        result.score += verdict.credit();
        match verdict {
            Verdict::Correct => result.correct += 1,
            Verdict::Partial => result.partial += 1,
            Verdict::Wrong => result.wrong += 1,
            Verdict::Unanswered => result.unanswered += 1,
        }
    }
    result.percentage = percentage(result.score, result.total);
    result
}

/// Rounded percentage of `score` out of `total`.
pub fn percentage(score: f64, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score / total as f64) * 100.0).round() as u32
}

/// Whole scores print without a fractional part.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}
