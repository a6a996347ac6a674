//! Core data model types for quizdeck.
//!
//! A [`Question`] is built once by the classifier and never mutated. Its
//! answer key is a tagged union, so grading matches on the variant instead
//! of probing optional fields.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Question variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    MultipleChoice,
    TrueFalse,
    TextInput,
    FillBlank,
    Matching,
    Sequence,
}

impl Variant {
    /// Short label shown next to a question.
    pub fn indicator(&self) -> &'static str {
        match self {
            Variant::MultipleChoice => "(Multiple Choice)",
            Variant::TrueFalse => "(True/False)",
            Variant::TextInput => "(Text Input)",
            Variant::FillBlank => "(Fill in the Blanks)",
            Variant::Matching => "(Matching)",
            Variant::Sequence => "(Sequence)",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::MultipleChoice => write!(f, "multiple-choice"),
            Variant::TrueFalse => write!(f, "true-false"),
            Variant::TextInput => write!(f, "text-input"),
            Variant::FillBlank => write!(f, "fill-blank"),
            Variant::Matching => write!(f, "matching"),
            Variant::Sequence => write!(f, "sequence"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple-choice" | "choice" | "mc" => Ok(Variant::MultipleChoice),
            "true-false" | "tf" => Ok(Variant::TrueFalse),
            "text-input" | "text" => Ok(Variant::TextInput),
            "fill-blank" | "fill" => Ok(Variant::FillBlank),
            "matching" | "match" => Ok(Variant::Matching),
            "sequence" | "order" => Ok(Variant::Sequence),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// A lettered answer option (`A`, `B`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub key: String,
    pub text: String,
}

/// An item to be put in order; ids are 1-based in option field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceOption {
    pub id: u32,
    pub text: String,
}

/// Variant-specific answer key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "kebab-case")]
pub enum AnswerKey {
    MultipleChoice {
        options: Vec<ChoiceOption>,
        /// Option keys that must be selected.
        correct: BTreeSet<String>,
    },
    TrueFalse {
        options: Vec<ChoiceOption>,
        correct: bool,
    },
    TextInput {
        accepted: Vec<String>,
    },
    FillBlank {
        blanks: Vec<String>,
    },
    Matching {
        left_items: Vec<String>,
        right_items: Vec<String>,
        correct_matches: BTreeMap<String, String>,
    },
    Sequence {
        options: Vec<SequenceOption>,
        correct_order: Vec<u32>,
    },
}

impl AnswerKey {
    pub fn variant(&self) -> Variant {
        match self {
            AnswerKey::MultipleChoice { .. } => Variant::MultipleChoice,
            AnswerKey::TrueFalse { .. } => Variant::TrueFalse,
            AnswerKey::TextInput { .. } => Variant::TextInput,
            AnswerKey::FillBlank { .. } => Variant::FillBlank,
            AnswerKey::Matching { .. } => Variant::Matching,
            AnswerKey::Sequence { .. } => Variant::Sequence,
        }
    }
}

/// One classified question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Value of the `QuestionNumber` column; informational only.
    #[serde(default)]
    pub number: String,
    /// Question text. Unique across the question set and used as the
    /// progress key everywhere.
    pub text: String,
    pub key: AnswerKey,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    pub fn variant(&self) -> Variant {
        self.key.variant()
    }

    /// `true` for multiple-choice questions with more than one correct option.
    pub fn is_multi_answer(&self) -> bool {
        matches!(&self.key, AnswerKey::MultipleChoice { correct, .. } if correct.len() > 1)
    }

    /// Explanation shown after validation. Sequences without an explicit
    /// explanation describe the correct order instead.
    pub fn explanation_text(&self) -> Option<String> {
        if let Some(explanation) = self.explanation.as_deref().filter(|e| !e.trim().is_empty()) {
            return Some(format!("Explanation: {explanation}"));
        }

        match &self.key {
            AnswerKey::Sequence {
                options,
                correct_order,
            } => {
                let steps: Vec<String> = correct_order
                    .iter()
                    .filter_map(|id| options.iter().find(|o| o.id == *id))
                    .enumerate()
                    .map(|(i, o)| format!("{}. {}", i + 1, o.text))
                    .collect();
                if steps.is_empty() {
                    None
                } else {
                    Some(format!("Correct order: {}", steps.join(" → ")))
                }
            }
            _ => None,
        }
    }
}

/// Outcome of grading one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Correct,
    Partial,
    Wrong,
    Unanswered,
}

impl Verdict {
    /// Everything short of `Correct` puts a question back into the retake pool.
    pub fn needs_retake(&self) -> bool {
        !matches!(self, Verdict::Correct)
    }

    /// Contribution to the submitted score.
    pub fn credit(&self) -> f64 {
        match self {
            Verdict::Correct => 1.0,
            Verdict::Partial => 0.5,
            Verdict::Wrong | Verdict::Unanswered => 0.0,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "correct"),
            Verdict::Partial => write!(f, "partial"),
            Verdict::Wrong => write!(f, "wrong"),
            Verdict::Unanswered => write!(f, "unanswered"),
        }
    }
}

/// Which questions a quiz draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizMode {
    /// Every question.
    All,
    /// Only questions that are wrong, partial or not yet answered.
    #[default]
    Retake,
}

impl QuizMode {
    pub fn toggled(self) -> Self {
        match self {
            QuizMode::All => QuizMode::Retake,
            QuizMode::Retake => QuizMode::All,
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::All => write!(f, "all"),
            QuizMode::Retake => write!(f, "retake"),
        }
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(QuizMode::All),
            "retake" => Ok(QuizMode::Retake),
            other => Err(format!("unknown quiz mode: {other}")),
        }
    }
}

pub const DEFAULT_QUIZ_TITLE: &str = "Enhanced Exam Preparation Quiz";
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 10;

/// User settings persisted alongside progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Cap on displayed questions; `None` shows all of them.
    #[serde(default, deserialize_with = "deserialize_question_cap")]
    pub num_questions: Option<u32>,
    #[serde(default)]
    pub enable_timer: bool,
    #[serde(default = "default_time_limit")]
    pub time_limit_minutes: u32,
    #[serde(default = "default_title")]
    pub quiz_title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_questions: None,
            enable_timer: false,
            time_limit_minutes: default_time_limit(),
            quiz_title: default_title(),
        }
    }
}

impl Settings {
    /// Effective question cap. Zero means no cap.
    pub fn question_limit(&self) -> Option<usize> {
        self.num_questions.filter(|n| *n > 0).map(|n| n as usize)
    }

    /// Countdown length in seconds, if a timer should run.
    pub fn timer_secs(&self) -> Option<u64> {
        (self.enable_timer && self.time_limit_minutes > 0)
            .then(|| u64::from(self.time_limit_minutes) * 60)
    }
}

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_MINUTES
}

fn default_title() -> String {
    DEFAULT_QUIZ_TITLE.to_string()
}

/// Accepts a number, a numeric string, `""` or `"all"`.
fn deserialize_question_cap<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cap {
        Number(u32),
        Text(String),
    }

    match Option::<Cap>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Cap::Number(n)) => Ok((n > 0).then_some(n)),
        Some(Cap::Text(s)) => {
            let s = s.trim();
            if s.is_empty() || s.eq_ignore_ascii_case("all") {
                Ok(None)
            } else {
                s.parse::<u32>()
                    .map(|n| (n > 0).then_some(n))
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_display_and_parse() {
        assert_eq!(Variant::FillBlank.to_string(), "fill-blank");
        assert_eq!("Matching".parse::<Variant>().unwrap(), Variant::Matching);
        assert_eq!("choice".parse::<Variant>().unwrap(), Variant::MultipleChoice);
        assert_eq!("TF".parse::<Variant>().unwrap(), Variant::TrueFalse);
        assert_eq!(" sequence ".parse::<Variant>().unwrap(), Variant::Sequence);
        assert!("essay".parse::<Variant>().is_err());
    }

    #[test]
    fn verdict_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Partial).unwrap(), "\"partial\"");
        let v: Verdict = serde_json::from_str("\"unanswered\"").unwrap();
        assert_eq!(v, Verdict::Unanswered);
    }

    #[test]
    fn verdict_credit_and_retake() {
        assert_eq!(Verdict::Correct.credit(), 1.0);
        assert_eq!(Verdict::Partial.credit(), 0.5);
        assert!(!Verdict::Correct.needs_retake());
        assert!(Verdict::Unanswered.needs_retake());
        assert!(Verdict::Partial.needs_retake());
    }

    #[test]
    fn settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.time_limit_minutes, 10);
        assert_eq!(settings.quiz_title, DEFAULT_QUIZ_TITLE);
        assert_eq!(settings.question_limit(), None);
        assert_eq!(settings.timer_secs(), None);
    }

    #[test]
    fn settings_accepts_legacy_question_caps() {
        let all: Settings = serde_json::from_str(r#"{"numQuestions":"all"}"#).unwrap();
        assert_eq!(all.num_questions, None);

        let text: Settings = serde_json::from_str(r#"{"numQuestions":"5"}"#).unwrap();
        assert_eq!(text.num_questions, Some(5));

        let number: Settings = serde_json::from_str(r#"{"numQuestions":7}"#).unwrap();
        assert_eq!(number.question_limit(), Some(7));

        let zero: Settings = serde_json::from_str(r#"{"numQuestions":0}"#).unwrap();
        assert_eq!(zero.question_limit(), None);

        let empty: Settings = serde_json::from_str(r#"{"numQuestions":""}"#).unwrap();
        assert_eq!(empty.num_questions, None);
    }

    #[test]
    fn timer_requires_positive_limit() {
        let settings = Settings {
            enable_timer: true,
            time_limit_minutes: 2,
            ..Settings::default()
        };
        assert_eq!(settings.timer_secs(), Some(120));

        let zero = Settings {
            enable_timer: true,
            time_limit_minutes: 0,
            ..Settings::default()
        };
        assert_eq!(zero.timer_secs(), None);
    }

    #[test]
    fn sequence_explanation_falls_back_to_correct_order() {
        let q = Question {
            number: "1".into(),
            text: "Order the planets".into(),
            key: AnswerKey::Sequence {
                options: vec![
                    SequenceOption { id: 1, text: "Earth".into() },
                    SequenceOption { id: 2, text: "Mercury".into() },
                    SequenceOption { id: 3, text: "Venus".into() },
                ],
                correct_order: vec![2, 3, 1],
            },
            explanation: None,
        };
        assert_eq!(
            q.explanation_text().unwrap(),
            "Correct order: 1. Mercury → 2. Venus → 3. Earth"
        );
    }

    #[test]
    fn explicit_explanation_wins() {
        let q = Question {
            number: "2".into(),
            text: "Capital of France?".into(),
            key: AnswerKey::TextInput {
                accepted: vec!["Paris".into()],
            },
            explanation: Some("Paris has been the capital since 987.".into()),
        };
        assert_eq!(
            q.explanation_text().unwrap(),
            "Explanation: Paris has been the capital since 987."
        );
    }
}
