//! User responses, one shape per question variant.
//!
//! Front ends translate their own input mechanics (clicks, drags, typed
//! lines) into a [`Response`]; the grading engine never sees anything else.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::model::{AnswerKey, Question, Variant};

/// A response to one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Response {
    /// Selected option keys (multiple-choice).
    Choices(BTreeSet<String>),
    /// True/false pick.
    Boolean(bool),
    /// Free text (text-input).
    Text(String),
    /// Blank fills in position order.
    Blanks(Vec<String>),
    /// Item ids in the arranged order (sequence).
    Order(Vec<u32>),
    /// Left item → right target placements (matching).
    Matches(BTreeMap<String, String>),
}

impl Response {
    /// An empty response grades as unanswered regardless of variant.
    pub fn is_empty(&self) -> bool {
        match self {
            Response::Choices(selected) => selected.is_empty(),
            Response::Boolean(_) => false,
            Response::Text(text) => text.trim().is_empty(),
            Response::Blanks(blanks) => blanks.iter().all(|b| b.trim().is_empty()),
            Response::Order(order) => order.is_empty(),
            Response::Matches(matches) => matches.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Response::Choices(_) => "choices",
            Response::Boolean(_) => "boolean",
            Response::Text(_) => "text",
            Response::Blanks(_) => "blanks",
            Response::Order(_) => "order",
            Response::Matches(_) => "matches",
        }
    }

    /// Whether this response shape can answer a question of `variant`.
    pub fn fits(&self, variant: Variant) -> bool {
        matches!(
            (self, variant),
            (Response::Choices(_), Variant::MultipleChoice)
                | (Response::Boolean(_), Variant::TrueFalse)
                | (Response::Text(_), Variant::TextInput)
                | (Response::Blanks(_), Variant::FillBlank)
                | (Response::Order(_), Variant::Sequence)
                | (Response::Matches(_), Variant::Matching)
        )
    }

    /// Convenience constructor for option keys.
    pub fn choices<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Response::Choices(keys.into_iter().map(Into::into).collect())
    }
}

/// Parse a typed line into a response for `question`.
///
/// Returns `None` for a blank line (the question stays unanswered) or when
/// the input cannot be read for this variant.
///
/// | variant         | input                    |
/// |-----------------|--------------------------|
/// | multiple-choice | `A,C` or `a c`           |
/// | true/false      | `t`, `false`, `yes`, ... |
/// | text-input      | anything                 |
/// | fill-blank      | `Paris \| Rome`          |
/// | sequence        | `3 1 2` or `3,1,2`       |
/// | matching        | `cat=meow; dog=woof`     |
pub fn parse_answer(question: &Question, input: &str) -> Option<Response> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    match &question.key {
        AnswerKey::MultipleChoice { .. } => {
            let keys: BTreeSet<String> = input
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_uppercase())
                .collect();
            Some(Response::Choices(keys))
        }
        AnswerKey::TrueFalse { .. } => parse_bool(input).map(Response::Boolean),
        AnswerKey::TextInput { .. } => Some(Response::Text(input.to_string())),
        AnswerKey::FillBlank { .. } => Some(Response::Blanks(
            input.split('|').map(|s| s.trim().to_string()).collect(),
        )),
        AnswerKey::Sequence { .. } => input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()
            .map(Response::Order),
        AnswerKey::Matching { .. } => {
            let matches: BTreeMap<String, String> = input
                .split(';')
                .filter_map(|pair| {
                    let (left, right) = pair.split_once('=')?;
                    let (left, right) = (left.trim(), right.trim());
                    (!left.is_empty() && !right.is_empty())
                        .then(|| (left.to_string(), right.to_string()))
                })
                .collect();
            Some(Response::Matches(matches))
        }
    }
}

/// Lenient boolean reading shared by the classifier and the CLI.
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.trim().to_lowercase().as_str() {
        "t" | "true" | "yes" | "y" | "1" => Some(true),
        "f" | "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}
