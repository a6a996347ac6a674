//! Session reports with JSON persistence and markdown rendering.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{QuizMode, Variant, Verdict};
use crate::session::QuizSession;
use crate::statistics::{QuizStats, SubmissionResult};

/// A record of one submitted quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    pub quiz_title: String,
    pub mode: QuizMode,
    pub result: SubmissionResult,
    /// Progress over the whole question set after submission.
    pub stats: QuizStats,
    /// Per-question outcomes in display order.
    pub outcomes: Vec<QuestionOutcome>,
}

/// How one displayed question went.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOutcome {
    pub number: String,
    pub text: String,
    pub variant: Variant,
    pub verdict: Verdict,
    pub message: String,
}

impl SessionReport {
    /// Build a report from a submitted session. Returns `None` until the
    /// session has been submitted.
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let result = *session.result()?;
        let outcomes = session
            .questions()
            .enumerate()
            .map(|(i, q)| {
                let (verdict, message) = session
                    .feedback(i)
                    .map(|f| (f.grade.verdict, f.grade.message))
                    .unwrap_or((Verdict::Unanswered, String::new()));
                QuestionOutcome {
                    number: q.number.clone(),
                    text: q.text.clone(),
                    variant: q.variant(),
                    verdict,
                    message,
                }
            })
            .collect();

        Some(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            quiz_title: session.settings().quiz_title.clone(),
            mode: session.mode(),
            result,
            stats: session.stats(),
            outcomes,
        })
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: SessionReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {}\n\n", self.quiz_title));
        md.push_str(&format!(
            "**{}** ({} mode, {})\n\n",
            self.result.summary(),
            self.mode,
            self.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str(&format!(
            "Correct: {} | Partial: {} | Wrong: {} | Unanswered: {}\n\n",
            self.result.correct, self.result.partial, self.result.wrong, self.result.unanswered
        ));

        if !self.outcomes.is_empty() {
            md.push_str("| # | Question | Type | Result |\n");
            md.push_str("|---|----------|------|--------|\n");
            for o in &self.outcomes {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    o.number,
                    o.text.replace('|', "\\|"),
                    o.variant,
                    o.verdict
                ));
            }
            md.push('\n');
        }

        md.push_str(&format!(
            "**Progress:** {} correct, {} to retake, {} unanswered\n",
            self.stats.correct, self.stats.wrong, self.stats.unanswered
        ));
        md
    }
}
