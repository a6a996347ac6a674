//! Per-question progress across sessions.
//!
//! Two signals are kept: the last verdict per question, and the set of
//! questions flagged for retake. They overlap but are not identical (an
//! unanswered verdict is recorded without flagging), and the retake set is
//! the union of both.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::model::{Question, Verdict};
use crate::statistics::QuizStats;
use crate::traits::StoredState;

/// Tracks verdicts and the wrongly-answered set, keyed by question text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressTracker {
    session_answers: HashMap<String, Verdict>,
    wrongly_answered: HashSet<String>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest verdict for a question.
    pub fn record_verdict(&mut self, question_text: &str, verdict: Verdict) {
        self.session_answers
            .insert(question_text.to_string(), verdict);
        match verdict {
            Verdict::Wrong | Verdict::Partial => {
                self.wrongly_answered.insert(question_text.to_string());
            }
            Verdict::Correct => {
                self.wrongly_answered.remove(question_text);
            }
            Verdict::Unanswered => {}
        }
    }

    /// Last recorded verdict, if any.
    pub fn verdict(&self, question_text: &str) -> Option<Verdict> {
        self.session_answers.get(question_text).copied()
    }

    /// A question leaves the retake pool only once its last verdict is
    /// correct and it is not flagged.
    pub fn needs_retake(&self, question_text: &str) -> bool {
        self.wrongly_answered.contains(question_text)
            || self
                .session_answers
                .get(question_text)
                .map_or(true, |v| v.needs_retake())
    }

    /// Texts of every question that still needs a retake.
    pub fn retake_set(&self, questions: &[Question]) -> BTreeSet<String> {
        questions
            .iter()
            .filter(|q| self.needs_retake(&q.text))
            .map(|q| q.text.clone())
            .collect()
    }

    /// Disjoint counts over `questions`.
    pub fn stats(&self, questions: &[Question]) -> QuizStats {
        let mut stats = QuizStats::default();
        for q in questions {
            let verdict = self.session_answers.get(&q.text);
            if self.wrongly_answered.contains(&q.text)
                || matches!(verdict, Some(Verdict::Wrong | Verdict::Partial))
            {
                stats.wrong += 1;
            } else if verdict == Some(&Verdict::Correct) {
                stats.correct += 1;
            } else {
                stats.unanswered += 1;
            }
        }
        stats
    }

    /// Whether questions exist and none of them needs a retake.
    pub fn is_mastered(&self, questions: &[Question]) -> bool {
        !questions.is_empty() && questions.iter().all(|q| !self.needs_retake(&q.text))
    }

    /// Clear both signals.
    pub fn reset(&mut self) {
        self.session_answers.clear();
        self.wrongly_answered.clear();
    }

    pub fn clear_session_answers(&mut self) {
        self.session_answers.clear();
    }

    pub fn clear_wrongly_answered(&mut self) {
        self.wrongly_answered.clear();
    }

    pub fn session_answers(&self) -> &HashMap<String, Verdict> {
        &self.session_answers
    }

    pub fn wrongly_answered(&self) -> &HashSet<String> {
        &self.wrongly_answered
    }

    /// Apply the progress fields of a stored record. Absent fields leave the
    /// current value untouched.
    pub fn restore(&mut self, state: &StoredState) {
        if let Some(answers) = &state.session_answers {
            self.session_answers = answers
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect();
        }
        if let Some(wrong) = &state.wrongly_answered {
            self.wrongly_answered = wrong.iter().cloned().collect();
        }
    }

    /// Progress fields as a record for persistence, with stable ordering.
    pub fn snapshot(&self) -> StoredState {
        StoredState {
            session_answers: Some(
                self.session_answers
                    .iter()
                    .map(|(k, v)| (k.clone(), *v))
                    .collect::<BTreeMap<_, _>>(),
            ),
            wrongly_answered: Some(
                self.wrongly_answered
                    .iter()
                    .cloned()
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect(),
            ),
            ..StoredState::default()
        }
    }
}
