//! Question classification.
//!
//! Turns one raw CSV row (header → value) into a typed [`Question`]. The
//! classifier is pure: no I/O, no shared state.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::ClassifyError;
use crate::model::{AnswerKey, ChoiceOption, Question, SequenceOption, Variant};
use crate::response::parse_bool;

/// A raw row, keyed by CSV header.
pub type RawFields = HashMap<String, String>;

/// Option columns in display order; the letter is the option key.
pub const OPTION_FIELDS: [(&str, &str); 5] = [
    ("OptionA", "A"),
    ("OptionB", "B"),
    ("OptionC", "C"),
    ("OptionD", "D"),
    ("OptionE", "E"),
];

/// Answer slot columns, in order.
pub const ANSWER_FIELDS: [&str; 5] = ["Answer 1", "Answer 2", "Answer 3", "Answer 4", "Answer 5"];

/// Columns that may carry an explicit question type.
const TYPE_FIELDS: [&str; 2] = ["QuestionType", "Type"];

const BLANK_MARKER: &str = "___";

/// Assigns a variant to a raw row and derives its answer key.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionClassifier;

impl QuestionClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a raw row into a question.
    pub fn classify(&self, raw: &RawFields) -> Result<Question, ClassifyError> {
        let text = field(raw, "QuestionText").ok_or(ClassifyError::EmptyQuestionText)?;
        let variant = self.detect_variant(raw);

        let key = match variant {
            Variant::MultipleChoice => AnswerKey::MultipleChoice {
                options: choice_options(raw),
                correct: answer_slots(raw).into_iter().map(|a| a.to_uppercase()).collect(),
            },
            Variant::TrueFalse => AnswerKey::TrueFalse {
                options: choice_options(raw),
                correct: true_false_answer(raw, text),
            },
            Variant::TextInput => AnswerKey::TextInput {
                accepted: answer_slots(raw),
            },
            Variant::FillBlank => AnswerKey::FillBlank {
                blanks: match field(raw, "BlankAnswers") {
                    Some(list) => split_list(list),
                    None => answer_slots(raw),
                },
            },
            Variant::Matching => AnswerKey::Matching {
                left_items: field(raw, "LeftItems").map(split_list).unwrap_or_default(),
                right_items: field(raw, "RightItems").map(split_list).unwrap_or_default(),
                correct_matches: field(raw, "CorrectMatches")
                    .map(parse_match_pairs)
                    .unwrap_or_default(),
            },
            Variant::Sequence => AnswerKey::Sequence {
                options: sequence_options(raw),
                correct_order: sequence_order(raw, text),
            },
        };

        Ok(Question {
            number: field(raw, "QuestionNumber").unwrap_or_default().to_string(),
            text: text.to_string(),
            key,
            explanation: field(raw, "Explanation").map(str::to_string),
        })
    }

    /// Pick a variant. An explicit type column always wins; otherwise the
    /// first matching rule applies.
    pub fn detect_variant(&self, raw: &RawFields) -> Variant {
        if let Some(explicit) = TYPE_FIELDS.iter().find_map(|f| field(raw, f)) {
            return explicit.parse().unwrap_or_else(|e: String| {
                tracing::debug!("{e}, treating as multiple-choice");
                Variant::MultipleChoice
            });
        }

        if field(raw, "LeftItems").is_some() && field(raw, "RightItems").is_some() {
            Variant::Matching
        } else if field(raw, "QuestionText").is_some_and(|t| t.contains(BLANK_MARKER)) {
            Variant::FillBlank
        } else if is_true_false(raw) {
            Variant::TrueFalse
        } else if field(raw, ANSWER_FIELDS[0]).is_some()
            && field(raw, "OptionA").is_none()
            && field(raw, "OptionB").is_none()
        {
            Variant::TextInput
        } else {
            Variant::MultipleChoice
        }
    }
}

/// Trimmed, non-empty value of a column.
fn field<'a>(raw: &'a RawFields, name: &str) -> Option<&'a str> {
    raw.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn is_true_false(raw: &RawFields) -> bool {
    let (Some(a), Some(b)) = (field(raw, "OptionA"), field(raw, "OptionB")) else {
        return false;
    };
    let only_two = OPTION_FIELDS[2..].iter().all(|(f, _)| field(raw, f).is_none());
    let mentions_bool = |s: &str| {
        let s = s.to_lowercase();
        s.contains("true") || s.contains("false")
    };
    only_two && (mentions_bool(a) || mentions_bool(b))
}

fn answer_slots(raw: &RawFields) -> Vec<String> {
    ANSWER_FIELDS
        .iter()
        .filter_map(|f| field(raw, f))
        .map(str::to_string)
        .collect()
}

fn choice_options(raw: &RawFields) -> Vec<ChoiceOption> {
    OPTION_FIELDS
        .iter()
        .filter_map(|(f, key)| {
            field(raw, f).map(|text| ChoiceOption {
                key: key.to_string(),
                text: text.to_string(),
            })
        })
        .collect()
}

/// Sequence item ids follow the option column position, so a gap in the
/// columns leaves a gap in the ids.
fn sequence_options(raw: &RawFields) -> Vec<SequenceOption> {
    OPTION_FIELDS
        .iter()
        .enumerate()
        .filter_map(|(i, (f, _))| {
            field(raw, f).map(|text| SequenceOption {
                id: i as u32 + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

fn sequence_order(raw: &RawFields, text: &str) -> Vec<u32> {
    answer_slots(raw)
        .iter()
        .filter_map(|slot| match slot.parse::<u32>() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::warn!("sequence question {text:?}: ignoring non-numeric order entry {slot:?}");
                None
            }
        })
        .collect()
}

fn true_false_answer(raw: &RawFields, text: &str) -> bool {
    let token = field(raw, ANSWER_FIELDS[0]).unwrap_or("True");

    // The answer may name an option key instead of spelling out the value.
    let resolved = OPTION_FIELDS
        .iter()
        .find(|(_, key)| key.eq_ignore_ascii_case(token))
        .and_then(|(f, _)| field(raw, f))
        .unwrap_or(token);

    let lowered = resolved.to_lowercase();
    if lowered.contains("true") {
        true
    } else if lowered.contains("false") {
        false
    } else {
        parse_bool(resolved).unwrap_or_else(|| {
            tracing::warn!("true/false question {text:?}: unreadable answer {token:?}, assuming True");
            true
        })
    }
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `"left-right, left-right"`. Pairs missing either side are skipped.
fn parse_match_pairs(list: &str) -> BTreeMap<String, String> {
    list.split(',')
        .filter_map(|pair| {
            let mut parts = pair.split('-').map(str::trim);
            let left = parts.next().filter(|s| !s.is_empty())?;
            let right = parts.next().filter(|s| !s.is_empty())?;
            Some((left.to_string(), right.to_string()))
        })
        .collect()
}

/// Option keys a multiple-choice answer names that have no option text.
pub fn unknown_choice_keys(options: &[ChoiceOption], correct: &BTreeSet<String>) -> Vec<String> {
    correct
        .iter()
        .filter(|k| !options.iter().any(|o| &o.key == *k))
        .cloned()
        .collect()
}

/// Number of `___` markers in a question text.
pub fn blank_marker_count(text: &str) -> usize {
    text.matches(BLANK_MARKER).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn classify(pairs: &[(&str, &str)]) -> Question {
        QuestionClassifier::new().classify(&raw(pairs)).unwrap()
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = QuestionClassifier::new()
            .classify(&raw(&[("QuestionNumber", "1"), ("QuestionText", "  ")]))
            .unwrap_err();
        assert_eq!(err, ClassifyError::EmptyQuestionText);
    }

    #[test]
    fn matching_detected_first() {
        let q = classify(&[
            ("QuestionText", "Match ___ animals"),
            ("LeftItems", "cat, dog"),
            ("RightItems", "meow, woof"),
            ("CorrectMatches", "cat-meow, dog-woof, broken-, -orphan"),
        ]);
        let AnswerKey::Matching {
            left_items,
            right_items,
            correct_matches,
        } = q.key
        else {
            panic!("expected matching");
        };
        assert_eq!(left_items, vec!["cat", "dog"]);
        assert_eq!(right_items, vec!["meow", "woof"]);
        assert_eq!(correct_matches.len(), 2);
        assert_eq!(correct_matches["dog"], "woof");
    }

    #[test]
    fn fill_blank_uses_blank_answers_or_slots() {
        let explicit = classify(&[
            ("QuestionText", "___ is the capital of ___"),
            ("BlankAnswers", "Paris, France"),
            ("Answer 1", "ignored"),
        ]);
        assert_eq!(
            explicit.key,
            AnswerKey::FillBlank {
                blanks: vec!["Paris".into(), "France".into()]
            }
        );

        let slots = classify(&[
            ("QuestionText", "___ wrote Hamlet"),
            ("Answer 1", " Shakespeare "),
            ("Answer 2", ""),
        ]);
        assert_eq!(
            slots.key,
            AnswerKey::FillBlank {
                blanks: vec!["Shakespeare".into()]
            }
        );
    }

    #[test]
    fn true_false_detection_and_default() {
        let q = classify(&[
            ("QuestionText", "The sky is green"),
            ("OptionA", "True"),
            ("OptionB", "False"),
            ("Answer 1", "False"),
        ]);
        assert_eq!(q.variant(), Variant::TrueFalse);
        assert!(matches!(q.key, AnswerKey::TrueFalse { correct: false, .. }));

        let defaulted = classify(&[
            ("QuestionText", "Water is wet"),
            ("OptionA", "true"),
            ("OptionB", "false"),
        ]);
        assert!(matches!(defaulted.key, AnswerKey::TrueFalse { correct: true, .. }));
    }

    #[test]
    fn true_false_answer_may_name_option_key() {
        let q = classify(&[
            ("QuestionText", "Rust has a garbage collector"),
            ("OptionA", "True"),
            ("OptionB", "False"),
            ("Answer 1", "B"),
        ]);
        assert!(matches!(q.key, AnswerKey::TrueFalse { correct: false, .. }));
    }

    #[test]
    fn three_options_is_not_true_false() {
        let q = classify(&[
            ("QuestionText", "Pick one"),
            ("OptionA", "True"),
            ("OptionB", "False"),
            ("OptionC", "Unknown"),
            ("Answer 1", "C"),
        ]);
        assert_eq!(q.variant(), Variant::MultipleChoice);
    }

    #[test]
    fn text_input_when_no_options() {
        let q = classify(&[
            ("QuestionText", "Capital of Italy?"),
            ("Answer 1", "Rome"),
            ("Answer 2", "Roma"),
        ]);
        assert_eq!(
            q.key,
            AnswerKey::TextInput {
                accepted: vec!["Rome".into(), "Roma".into()]
            }
        );
    }

    #[test]
    fn multiple_choice_default_with_multi_answers() {
        let q = classify(&[
            ("QuestionNumber", "7"),
            ("QuestionText", "Which are primes?"),
            ("OptionA", "2"),
            ("OptionB", "4"),
            ("OptionC", "5"),
            ("Answer 1", "A"),
            ("Answer 2", "c"),
            ("Explanation", "2 and 5 have no divisors"),
        ]);
        assert_eq!(q.number, "7");
        assert!(q.is_multi_answer());
        let AnswerKey::MultipleChoice { options, correct } = &q.key else {
            panic!("expected multiple-choice");
        };
        assert_eq!(options.len(), 3);
        assert!(correct.contains("A") && correct.contains("C"));
        assert_eq!(q.explanation.as_deref(), Some("2 and 5 have no divisors"));
    }

    #[test]
    fn explicit_type_overrides_detection() {
        let q = classify(&[
            ("QuestionText", "Order ___ these"),
            ("Type", "sequence"),
            ("OptionA", "first"),
            ("OptionC", "third"),
            ("Answer 1", "1"),
            ("Answer 2", "3"),
            ("Answer 3", "x"),
        ]);
        let AnswerKey::Sequence {
            options,
            correct_order,
        } = q.key
        else {
            panic!("expected sequence");
        };
        assert_eq!(options.iter().map(|o| o.id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(correct_order, vec![1, 3]);
    }

    #[test]
    fn unknown_explicit_type_falls_back_to_multiple_choice() {
        let q = classify(&[
            ("QuestionText", "Essay time"),
            ("QuestionType", "essay"),
            ("LeftItems", "a"),
            ("RightItems", "b"),
        ]);
        assert_eq!(q.variant(), Variant::MultipleChoice);
    }

    #[test]
    fn helpers() {
        assert_eq!(blank_marker_count("___ and ___"), 2);
        let options = vec![ChoiceOption {
            key: "A".into(),
            text: "x".into(),
        }];
        let correct = BTreeSet::from(["A".to_string(), "D".to_string()]);
        assert_eq!(unknown_choice_keys(&options, &correct), vec!["D"]);
    }
}
