use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ResumePolicy, SessionContext, SessionSettings};
use crate::dto::submission_dto::SubmissionPatch;
use crate::error::{Error, Result};
use crate::models::{
    answer::{AnswerMap, AnswerRecord},
    question::{AnswerValue, Question},
    submission::Submission,
    test::Test,
};
use crate::services::grading_service::{GradingService, ScoreSummary};
use crate::utils::time::{elapsed_seconds, format_countdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionPhase {
    Loading,
    Ready,
    Active,
    Submitting,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SaveStatus {
    Idle,
    Saving,
    Saved,
    NotSaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWarning {
    pub remaining_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not counting down.
    Idle,
    Continue,
    Warning(TimeWarning),
    /// Raised on the tick that reaches zero, and again on every tick while a
    /// failed timeout submit waits to be retried.
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinalizeReason {
    Manual,
    Timeout,
}

/// Autosave work produced by an answer change. `seq` grows with every change.
#[derive(Debug, Clone, PartialEq)]
pub struct AutosaveRequest {
    pub seq: u64,
    pub submission_id: String,
    pub answers: AnswerMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReport {
    pub seq: u64,
    pub saved: bool,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeRequest {
    pub reason: FinalizeReason,
    pub submission_id: String,
    pub patch: SubmissionPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub submission_id: Option<String>,
    pub current_index: usize,
    pub question_count: usize,
    pub answers: AnswerMap,
    pub answered_count: usize,
    pub remaining_seconds: u32,
    /// The countdown reached zero; answers are closed and only submit remains.
    pub time_up: bool,
    pub save_status: SaveStatus,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_warning: Option<TimeWarning>,
    pub last_finalize_error: Option<String>,
    pub score: Option<ScoreSummary>,
}

impl SessionSnapshot {
    pub fn countdown(&self) -> String {
        format_countdown(self.remaining_seconds)
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.get(question_id).is_some_and(|a| !a.is_empty())
    }

    pub fn unanswered_count(&self) -> usize {
        self.question_count.saturating_sub(self.answered_count)
    }

    /// Advisory only: leaving now would abandon an attempt in progress.
    pub fn should_confirm_leave(&self) -> bool {
        matches!(self.phase, SessionPhase::Active | SessionPhase::Submitting)
    }
}

/// State of one in-progress attempt.
///
/// Purely in-memory: persistence work is handed back to the caller as
/// [`AutosaveRequest`] and [`FinalizeRequest`] values, and results are fed
/// back through [`TestSession::apply_save_report`] and
/// [`TestSession::complete_finalize`].
pub struct TestSession {
    context: SessionContext,
    settings: SessionSettings,
    phase: SessionPhase,
    test: Option<Test>,
    questions: Vec<Question>,
    submission_id: Option<String>,
    current_index: usize,
    answers: AnswerMap,
    remaining_seconds: u32,
    expired: bool,
    timeout_retry_pending: bool,
    raised_warnings: BTreeSet<u32>,
    last_warning: Option<TimeWarning>,
    save_status: SaveStatus,
    last_saved_at: Option<DateTime<Utc>>,
    latest_save_seq: u64,
    applied_save_seq: u64,
    pending_score: Option<ScoreSummary>,
    score: Option<ScoreSummary>,
    last_finalize_error: Option<String>,
}

impl TestSession {
    pub fn new(context: SessionContext, settings: SessionSettings) -> Self {
        Self {
            context,
            settings,
            phase: SessionPhase::Loading,
            test: None,
            questions: Vec::new(),
            submission_id: None,
            current_index: 0,
            answers: AnswerMap::new(),
            remaining_seconds: 0,
            expired: false,
            timeout_retry_pending: false,
            raised_warnings: BTreeSet::new(),
            last_warning: None,
            save_status: SaveStatus::Idle,
            last_saved_at: None,
            latest_save_seq: 0,
            applied_save_seq: 0,
            pending_score: None,
            score: None,
            last_finalize_error: None,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn test(&self) -> Option<&Test> {
        self.test.as_ref()
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn last_finalize_error(&self) -> Option<&str> {
        self.last_finalize_error.as_deref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// Seeds the session from the loaded test and the submission being
    /// started or resumed. `questions` must already be in presentation order.
    pub fn initialize(
        &mut self,
        test: Test,
        questions: Vec<Question>,
        submission: &Submission,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.expect_phase(SessionPhase::Loading, "initialize")?;
        if questions.is_empty() {
            return Err(Error::TestConfiguration(format!(
                "Test {} has no questions",
                test.id
            )));
        }

        let limit = test.time_limit_seconds();
        self.remaining_seconds = match self.settings.resume_policy {
            ResumePolicy::FullReset => limit,
            ResumePolicy::SeedFromStartTime => {
                limit.saturating_sub(elapsed_seconds(submission.start_time, now))
            }
        };
        self.expired = self.remaining_seconds == 0;
        // Marks the session already started below are not announced.
        self.raised_warnings = self
            .settings
            .warning_thresholds
            .iter()
            .copied()
            .filter(|t| *t >= self.remaining_seconds)
            .collect();

        self.answers = submission.answer_map();
        self.submission_id = Some(submission.id.clone());
        self.current_index = 0;
        self.questions = questions;
        self.test = Some(test);
        self.phase = SessionPhase::Ready;

        tracing::debug!(
            submission_id = %submission.id,
            remaining_seconds = self.remaining_seconds,
            resumed_answers = self.answers.len(),
            "Session initialized"
        );
        Ok(())
    }

    pub fn start(&mut self) -> Result<()> {
        self.expect_phase(SessionPhase::Ready, "start")?;
        self.phase = SessionPhase::Active;
        Ok(())
    }

    /// Moves to any question; skipping ahead is allowed.
    pub fn select_question(&mut self, index: usize) -> Result<()> {
        if !matches!(self.phase, SessionPhase::Ready | SessionPhase::Active) {
            return Err(self.wrong_phase("select a question"));
        }
        if index >= self.questions.len() {
            return Err(Error::InvalidState(format!(
                "Question index {} out of range (0..{})",
                index,
                self.questions.len()
            )));
        }
        self.current_index = index;
        Ok(())
    }

    /// Steps forward; returns `false` on the last question.
    pub fn next_question(&mut self) -> Result<bool> {
        let next = self.current_index + 1;
        if next >= self.questions.len() {
            self.expect_navigable()?;
            return Ok(false);
        }
        self.select_question(next).map(|_| true)
    }

    /// Steps back; returns `false` on the first question.
    pub fn prev_question(&mut self) -> Result<bool> {
        match self.current_index.checked_sub(1) {
            Some(prev) => self.select_question(prev).map(|_| true),
            None => self.expect_navigable().map(|_| false),
        }
    }

    /// Records the answer and returns the autosave to run for it.
    pub fn set_answer(&mut self, question_id: &str, value: AnswerValue) -> Result<AutosaveRequest> {
        self.expect_phase(SessionPhase::Active, "answer")?;
        if self.expired {
            return Err(Error::InvalidState(
                "Time is up; answers can no longer change".to_string(),
            ));
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(Error::BadRequest(format!(
                "Question {} is not part of this test",
                question_id
            )));
        }
        let submission_id = self.require_submission_id()?;

        self.answers.insert(question_id.to_string(), value);
        self.latest_save_seq += 1;
        self.save_status = SaveStatus::Saving;

        Ok(AutosaveRequest {
            seq: self.latest_save_seq,
            submission_id,
            answers: self.answers.clone(),
        })
    }

    /// Applies an autosave outcome. Reports older than the last applied one
    /// are ignored; returns whether the report was applied.
    pub fn apply_save_report(&mut self, report: SaveReport) -> bool {
        if report.seq <= self.applied_save_seq || report.seq > self.latest_save_seq {
            return false;
        }
        self.applied_save_seq = report.seq;
        if report.saved {
            self.last_saved_at = Some(report.at);
        }
        if matches!(self.phase, SessionPhase::Completed) {
            return true;
        }
        self.save_status = if report.seq < self.latest_save_seq {
            SaveStatus::Saving
        } else if report.saved {
            SaveStatus::Saved
        } else {
            SaveStatus::NotSaved
        };
        true
    }

    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SessionPhase::Active {
            return TickOutcome::Idle;
        }
        if self.expired {
            return if self.timeout_retry_pending {
                TickOutcome::Expired
            } else {
                TickOutcome::Idle
            };
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.expired = true;
            return TickOutcome::Expired;
        }

        let crossed: Vec<u32> = self
            .settings
            .warning_thresholds
            .iter()
            .copied()
            .filter(|t| self.remaining_seconds <= *t && !self.raised_warnings.contains(t))
            .collect();
        if crossed.is_empty() {
            return TickOutcome::Continue;
        }
        self.raised_warnings.extend(crossed.iter().copied());
        let warning = TimeWarning {
            remaining_seconds: crossed.into_iter().min().unwrap_or(self.remaining_seconds),
        };
        self.last_warning = Some(warning);
        TickOutcome::Warning(warning)
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Scores the answers and prepares the completing update.
    ///
    /// Returns `Ok(None)` while a finalize is already in flight or after the
    /// session completed, so racing submit and timeout finalize only once.
    pub fn begin_finalize(
        &mut self,
        reason: FinalizeReason,
        now: DateTime<Utc>,
    ) -> Result<Option<FinalizeRequest>> {
        match self.phase {
            SessionPhase::Submitting | SessionPhase::Completed => return Ok(None),
            SessionPhase::Active => {}
            _ => return Err(self.wrong_phase("submit")),
        }
        let submission_id = self.require_submission_id()?;
        let limit = self
            .test
            .as_ref()
            .map(Test::time_limit_seconds)
            .unwrap_or_default();

        let summary = GradingService::score(&self.questions, &self.answers);
        let time_spent = limit.saturating_sub(self.remaining_seconds);
        let patch = SubmissionPatch::finalize(
            AnswerRecord::from_map(&self.answers),
            summary.earned_points,
            time_spent,
            now,
        );

        self.pending_score = Some(summary);
        self.last_finalize_error = None;
        self.timeout_retry_pending = false;
        self.phase = SessionPhase::Submitting;

        Ok(Some(FinalizeRequest {
            reason,
            submission_id,
            patch,
        }))
    }

    /// A failed finalize returns the session to `Active` with the error kept
    /// for display; the submission stays incomplete and submit can be retried.
    /// Once time is up the retry also happens on the next tick.
    pub fn complete_finalize(&mut self, outcome: std::result::Result<(), String>) {
        if self.phase != SessionPhase::Submitting {
            return;
        }
        match outcome {
            Ok(()) => {
                self.score = self.pending_score.take();
                self.phase = SessionPhase::Completed;
            }
            Err(message) => {
                self.pending_score = None;
                self.last_finalize_error = Some(message);
                self.timeout_retry_pending = self.expired;
                self.phase = SessionPhase::Active;
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            submission_id: self.submission_id.clone(),
            current_index: self.current_index,
            question_count: self.questions.len(),
            answered_count: self
                .questions
                .iter()
                .filter(|q| self.answers.get(&q.id).is_some_and(|a| !a.is_empty()))
                .count(),
            answers: self.answers.clone(),
            remaining_seconds: self.remaining_seconds,
            time_up: self.expired,
            save_status: self.save_status,
            last_saved_at: self.last_saved_at,
            last_warning: self.last_warning,
            last_finalize_error: self.last_finalize_error.clone(),
            score: self.score.clone(),
        }
    }

    fn require_submission_id(&self) -> Result<String> {
        self.submission_id
            .clone()
            .ok_or_else(|| Error::InvalidState("Session has no submission".to_string()))
    }

    fn expect_navigable(&self) -> Result<()> {
        if matches!(self.phase, SessionPhase::Ready | SessionPhase::Active) {
            Ok(())
        } else {
            Err(self.wrong_phase("navigate"))
        }
    }

    fn expect_phase(&self, expected: SessionPhase, action: &str) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(self.wrong_phase(action))
        }
    }

    fn wrong_phase(&self, action: &str) -> Error {
        Error::InvalidState(format!("Cannot {} while session is {:?}", action, self.phase))
    }
}
