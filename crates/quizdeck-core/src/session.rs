//! Quiz session controller.
//!
//! Owns the question set, the displayed subset, the user's responses and
//! progress, and drives them through `Loading → Active → Submitted`. Grading
//! and state changes are synchronous; persistence is queued on a background
//! task and never blocks or fails a grading call.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::classifier::QuestionClassifier;
use crate::error::{LoadError, SessionError};
use crate::grading::{Grade, GradingEngine};
use crate::model::{Question, QuizMode, Settings, Verdict};
use crate::parser::{load_questions, parse_questions_with};
use crate::persist::Persister;
use crate::progress::ProgressTracker;
use crate::response::Response;
use crate::statistics::{score_verdicts, QuizStats, SubmissionResult};
use crate::timer::{Countdown, TickOutcome};
use crate::traits::{StateField, Store, StoredState};

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No quiz on screen: nothing loaded yet, or the load failed.
    Loading,
    /// Accepting responses.
    Active,
    /// Scored; input disabled until the next start.
    Submitted,
}

/// Feedback for one validated question.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub grade: Grade,
    pub explanation: Option<String>,
}

/// The quiz session controller.
pub struct QuizSession {
    store: Arc<dyn Store>,
    user: String,
    classifier: QuestionClassifier,
    grader: GradingEngine,
    rng: StdRng,
    persister: Persister,

    settings: Settings,
    mode: QuizMode,
    progress: ProgressTracker,

    questions: Vec<Question>,
    /// Indices into `questions`, in display order.
    displayed: Vec<usize>,
    responses: Vec<Option<Response>>,
    grades: Vec<Option<Grade>>,
    phase: Phase,
    countdown: Option<Countdown>,
    result: Option<SubmissionResult>,
}

impl QuizSession {
    /// Create a session persisting to `store` under `user`.
    ///
    /// Persistence writes run on the current tokio runtime.
    pub fn new(store: Arc<dyn Store>, user: impl Into<String>) -> Self {
        let user = user.into();
        let persister = Persister::spawn(Arc::clone(&store), user.clone());
        Self {
            store,
            user,
            classifier: QuestionClassifier::new(),
            grader: GradingEngine::new(),
            rng: StdRng::from_entropy(),
            persister,
            settings: Settings::default(),
            mode: QuizMode::default(),
            progress: ProgressTracker::new(),
            questions: Vec::new(),
            displayed: Vec::new(),
            responses: Vec::new(),
            grades: Vec::new(),
            phase: Phase::Loading,
            countdown: None,
            result: None,
        }
    }

    /// Use a fixed shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_classifier(mut self, classifier: QuestionClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Initial settings, used until stored settings are restored.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_mode(mut self, mode: QuizMode) -> Self {
        self.mode = mode;
        self
    }

    /// Apply the user's stored settings and progress. A missing record or a
    /// failing store leaves the current values.
    pub async fn restore(&mut self) {
        match self.store.load(&self.user).await {
            Ok(Some(state)) => {
                if let Some(settings) = state.settings.clone() {
                    self.settings = settings;
                }
                self.progress.restore(&state);
                tracing::debug!(
                    "restored {} answers, {} flagged for retake from {} store",
                    self.progress.session_answers().len(),
                    self.progress.wrongly_answered().len(),
                    self.store.name()
                );
            }
            Ok(None) => tracing::debug!("no stored progress for user"),
            Err(e) => tracing::warn!("could not load stored progress, starting fresh: {e}"),
        }
    }

    /// Load a question set from CSV text and start a quiz.
    ///
    /// On failure the session stays in `Loading` and keeps any questions it
    /// had.
    pub fn load(&mut self, csv: &str) -> Result<usize, LoadError> {
        let questions = parse_questions_with(csv, &self.classifier)?;
        Ok(self.install(questions))
    }

    /// Load a question file and start a quiz.
    pub fn load_questions(&mut self, path: &Path) -> Result<usize, LoadError> {
        let questions = load_questions(path)?;
        Ok(self.install(questions))
    }

    fn install(&mut self, questions: Vec<Question>) -> usize {
        tracing::info!("loaded {} questions", questions.len());
        self.questions = questions;
        self.regenerate()
    }

    /// Start a new quiz over the current mode's subset. Used to retake after
    /// a submission.
    pub fn start(&mut self) -> Result<usize, SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::NotLoaded);
        }
        Ok(self.regenerate())
    }

    fn regenerate(&mut self) -> usize {
        let mut subset: Vec<usize> = match self.mode {
            QuizMode::All => (0..self.questions.len()).collect(),
            QuizMode::Retake => self
                .questions
                .iter()
                .enumerate()
                .filter(|(_, q)| self.progress.needs_retake(&q.text))
                .map(|(i, _)| i)
                .collect(),
        };
        subset.shuffle(&mut self.rng);
        if let Some(limit) = self.settings.question_limit() {
            subset.truncate(limit);
        }

        self.responses = vec![None; subset.len()];
        self.grades = vec![None; subset.len()];
        self.displayed = subset;
        self.countdown = self.settings.timer_secs().map(Countdown::new);
        self.result = None;
        self.phase = Phase::Active;

        tracing::info!(
            "quiz started in {} mode with {} of {} questions",
            self.mode,
            self.displayed.len(),
            self.questions.len()
        );
        self.displayed.len()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Every loaded question, in file order.
    pub fn all_questions(&self) -> &[Question] {
        &self.questions
    }

    /// Displayed questions, in display order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> + '_ {
        self.displayed.iter().map(|i| &self.questions[*i])
    }

    /// Number of displayed questions.
    pub fn len(&self) -> usize {
        self.displayed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displayed.is_empty()
    }

    pub fn question(&self, index: usize) -> Result<&Question, SessionError> {
        if self.phase == Phase::Loading {
            return Err(SessionError::NotLoaded);
        }
        self.displayed
            .get(index)
            .map(|i| &self.questions[*i])
            .ok_or(SessionError::IndexOutOfRange {
                index,
                len: self.displayed.len(),
            })
    }

    /// The current response to a displayed question.
    pub fn response(&self, index: usize) -> Option<&Response> {
        self.responses.get(index).and_then(Option::as_ref)
    }

    /// Set the response for a displayed question.
    pub fn respond(&mut self, index: usize, response: Response) -> Result<(), SessionError> {
        let variant = self.active_question(index)?.variant();
        if !response.fits(variant) {
            return Err(SessionError::ResponseMismatch {
                expected: variant,
                got: response.kind(),
            });
        }
        self.responses[index] = Some(response);
        Ok(())
    }

    /// Forget the response for a displayed question.
    pub fn clear_response(&mut self, index: usize) -> Result<(), SessionError> {
        self.active_question(index)?;
        self.responses[index] = None;
        Ok(())
    }

    /// Grade the current response to one question and record the verdict.
    pub fn validate(&mut self, index: usize) -> Result<Verdict, SessionError> {
        self.active_question(index)?;
        let verdict = self.grade_displayed(index);
        self.persist_progress();
        Ok(verdict)
    }

    /// Feedback from the last validation of a displayed question.
    pub fn feedback(&self, index: usize) -> Option<Feedback> {
        let grade = self.grades.get(index)?.clone()?;
        let question = self.question(index).ok()?;
        Some(Feedback {
            grade,
            explanation: question.explanation_text(),
        })
    }

    /// Grade every displayed question once, score the quiz and disable input.
    pub fn submit(&mut self) -> Result<SubmissionResult, SessionError> {
        match self.phase {
            Phase::Loading => return Err(SessionError::NotLoaded),
            Phase::Submitted => return Err(SessionError::NotActive),
            Phase::Active => {}
        }

        let verdicts: Vec<Verdict> = (0..self.displayed.len())
            .map(|i| self.grade_displayed(i))
            .collect();
        self.persist_progress();

        let result = score_verdicts(verdicts);
        if let Some(countdown) = &mut self.countdown {
            countdown.cancel();
        }
        self.phase = Phase::Submitted;
        self.result = Some(result);

        tracing::info!("quiz submitted: {}", result.summary());
        Ok(result)
    }

    /// Result of the last submission, while it is on screen.
    pub fn result(&self) -> Option<&SubmissionResult> {
        self.result.as_ref()
    }

    /// Advance the countdown by one second. Returns the submission result
    /// the one time the countdown expires.
    pub fn tick(&mut self) -> Option<SubmissionResult> {
        if self.phase != Phase::Active {
            return None;
        }
        match self.countdown.as_mut()?.tick() {
            TickOutcome::Expired => {
                tracing::info!("time is up, submitting");
                self.submit().ok()
            }
            TickOutcome::Running(_) | TickOutcome::Stopped => None,
        }
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    /// Switch mode. A loaded session starts a new quiz.
    pub fn set_mode(&mut self, mode: QuizMode) {
        self.mode = mode;
        if !self.questions.is_empty() {
            self.regenerate();
        }
    }

    pub fn toggle_mode(&mut self) -> QuizMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Start over with every question.
    pub fn restart_all(&mut self) {
        self.set_mode(QuizMode::All);
    }

    /// Clear all progress. A loaded session starts a new quiz.
    pub fn reset(&mut self) {
        self.progress.reset();
        self.persister.clear(StateField::SessionAnswers);
        self.persister.clear(StateField::WronglyAnswered);
        tracing::info!("progress reset");
        if !self.questions.is_empty() {
            self.regenerate();
        }
    }

    pub fn clear_session_answers(&mut self) {
        self.progress.clear_session_answers();
        self.persister.clear(StateField::SessionAnswers);
    }

    pub fn clear_wrongly_answered(&mut self) {
        self.progress.clear_wrongly_answered();
        self.persister.clear(StateField::WronglyAnswered);
    }

    /// Replace settings and persist them. Takes effect at the next start.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        let mut record = StoredState::with_settings(self.settings.clone());
        record.last_updated = Some(Utc::now());
        self.persister.save(record, true);
    }

    pub fn stats(&self) -> QuizStats {
        self.progress.stats(&self.questions)
    }

    pub fn retake_set(&self) -> BTreeSet<String> {
        self.progress.retake_set(&self.questions)
    }

    /// Every loaded question has been answered correctly.
    pub fn is_mastered(&self) -> bool {
        self.progress.is_mastered(&self.questions)
    }

    /// Wait for queued writes to reach the store.
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    fn active_question(&self, index: usize) -> Result<&Question, SessionError> {
        match self.phase {
            Phase::Loading => Err(SessionError::NotLoaded),
            Phase::Submitted => Err(SessionError::NotActive),
            Phase::Active => self.question(index),
        }
    }

    fn grade_displayed(&mut self, index: usize) -> Verdict {
        let question = &self.questions[self.displayed[index]];
        let grade = self
            .grader
            .evaluate(question, self.responses[index].as_ref());
        let verdict = grade.verdict;
        tracing::debug!("question {:?} graded {verdict}", question.number);
        self.progress.record_verdict(&question.text, verdict);
        self.grades[index] = Some(grade);
        verdict
    }

    fn persist_progress(&self) {
        let mut record = self.progress.snapshot();
        record.last_updated = Some(Utc::now());
        self.persister.save(record, true);
    }
}
