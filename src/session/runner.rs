use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::engine::{
    AutosaveRequest, FinalizeReason, SaveReport, SessionPhase, SessionSnapshot, TestSession,
    TickOutcome,
};
use super::timer::CountdownTimer;
use super::{SessionContext, SessionSettings, SubmissionLifecycle};
use crate::error::{Error, Result};
use crate::models::{question::{AnswerValue, Question}, submission::Submission, test::Test};
use crate::utils::time::now;
use crate::widgets::{AnswerCallback, Widget};

enum Command {
    SelectQuestion {
        index: usize,
        reply: oneshot::Sender<Result<()>>,
    },
    NextQuestion {
        reply: oneshot::Sender<Result<bool>>,
    },
    PrevQuestion {
        reply: oneshot::Sender<Result<bool>>,
    },
    SetAnswer {
        question_id: String,
        value: AnswerValue,
    },
    Submit {
        reply: oneshot::Sender<Result<Submission>>,
    },
}

/// Cloneable front end of a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshot: watch::Receiver<SessionSnapshot>,
    test: Arc<Test>,
    questions: Arc<Vec<Question>>,
}

impl SessionHandle {
    pub fn test(&self) -> &Test {
        &self.test
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Waits until the published state satisfies `f`.
    pub async fn wait_for(&mut self, f: impl FnMut(&SessionSnapshot) -> bool) -> Result<SessionSnapshot> {
        self.snapshot
            .wait_for(f)
            .await
            .map(|s| s.clone())
            .map_err(|_| Error::InvalidState("Session has ended".to_string()))
    }

    pub async fn select_question(&self, index: usize) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::SelectQuestion { index, reply })?;
        rx.await.map_err(|_| ended())?
    }

    /// Moves to the next question; `false` when already on the last one.
    pub async fn next_question(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::NextQuestion { reply })?;
        rx.await.map_err(|_| ended())?
    }

    /// Moves to the previous question; `false` when already on the first one.
    pub async fn prev_question(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::PrevQuestion { reply })?;
        rx.await.map_err(|_| ended())?
    }

    /// Queues the answer and returns at once; the autosave runs in the background.
    pub fn set_answer(&self, question_id: impl Into<String>, value: AnswerValue) -> Result<()> {
        self.send(Command::SetAnswer {
            question_id: question_id.into(),
            value,
        })
    }

    /// Finalizes the submission and waits for the outcome. On failure the
    /// session stays open and submit may be called again.
    pub async fn submit(&self) -> Result<Submission> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Submit { reply })?;
        rx.await.map_err(|_| ended())?
    }

    /// Callback that routes widget changes for `question_id` into the session.
    pub fn answer_callback(&self, question_id: impl Into<String>) -> AnswerCallback {
        let handle = self.clone();
        let question_id = question_id.into();
        Box::new(move |value| {
            if let Err(e) = handle.set_answer(question_id.clone(), value) {
                debug!(question_id = %question_id, error = %e, "Answer dropped");
            }
        })
    }

    /// Builds the widget for the question at `index`, restored from the
    /// current answer and disabled once the session stops accepting input
    /// or time is up.
    pub fn widget(&self, index: usize) -> Result<Widget> {
        let question = self.questions.get(index).ok_or_else(|| {
            Error::InvalidState(format!("Question index {} out of range", index))
        })?;
        let snapshot = self.snapshot();
        let disabled = snapshot.phase != SessionPhase::Active || snapshot.time_up;
        Ok(Widget::for_question(
            question,
            snapshot.answers.get(&question.id),
            disabled,
            self.answer_callback(question.id.clone()),
        ))
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands.send(command).map_err(|_| ended())
    }
}

fn ended() -> Error {
    Error::InvalidState("Session has ended".to_string())
}

/// Single event loop that owns the session state. User commands, timer ticks
/// and autosave results are applied one at a time in arrival order.
pub struct SessionRunner {
    session: TestSession,
    lifecycle: SubmissionLifecycle,
    commands: mpsc::UnboundedReceiver<Command>,
    save_tx: mpsc::UnboundedSender<SaveReport>,
    save_rx: mpsc::UnboundedReceiver<SaveReport>,
    ticks: mpsc::UnboundedReceiver<()>,
    timer: Option<CountdownTimer>,
    snapshot: watch::Sender<SessionSnapshot>,
    completed: Option<Submission>,
}

impl SessionRunner {
    /// Loads the test, starts or resumes the submission and spawns the loop.
    pub async fn start(
        lifecycle: SubmissionLifecycle,
        ctx: SessionContext,
        settings: SessionSettings,
    ) -> Result<(SessionHandle, JoinHandle<()>)> {
        let tick_interval = settings.tick_interval;
        let mut session = TestSession::new(ctx.clone(), settings);

        let (test, questions) = lifecycle.load(&ctx).await?;
        let submission = lifecycle.start_or_resume(&ctx, test.total_points).await?;
        session.initialize(test.clone(), questions.clone(), &submission, now())?;
        session.start()?;

        info!(
            submission_id = %submission.id,
            candidate_id = %ctx.candidate_id,
            test_id = %ctx.test_id,
            remaining_seconds = session.remaining_seconds(),
            "Session started"
        );

        let (command_tx, commands) = mpsc::unbounded_channel();
        let (save_tx, save_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());
        let (timer, ticks) = CountdownTimer::start(tick_interval);

        let runner = SessionRunner {
            session,
            lifecycle,
            commands,
            save_tx,
            save_rx,
            ticks,
            timer: Some(timer),
            snapshot: snapshot_tx,
            completed: None,
        };
        let task = tokio::spawn(runner.run());

        let handle = SessionHandle {
            commands: command_tx,
            snapshot: snapshot_rx,
            test: Arc::new(test),
            questions: Arc::new(questions),
        };
        Ok((handle, task))
    }

    async fn run(mut self) {
        if self.session.is_expired() {
            let _ = self.finalize(FinalizeReason::Timeout).await;
        }

        while self.completed.is_none() {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => {
                        info!(
                            submission_id = ?self.session.snapshot().submission_id,
                            "Session abandoned with an incomplete submission"
                        );
                        break;
                    }
                },
                Some(report) = self.save_rx.recv() => {
                    self.session.apply_save_report(report);
                }
                Some(()) = self.ticks.recv() => self.handle_tick().await,
            }
            self.publish();
        }

        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.publish();

        // Commands that raced the final submit.
        self.commands.close();
        while let Some(command) = self.commands.recv().await {
            self.handle_command(command).await;
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SelectQuestion { index, reply } => {
                let _ = reply.send(self.session.select_question(index));
            }
            Command::NextQuestion { reply } => {
                let _ = reply.send(self.session.next_question());
            }
            Command::PrevQuestion { reply } => {
                let _ = reply.send(self.session.prev_question());
            }
            Command::SetAnswer { question_id, value } => {
                match self.session.set_answer(&question_id, value) {
                    Ok(request) => self.spawn_autosave(request),
                    Err(e) => debug!(question_id = %question_id, error = %e, "Answer rejected"),
                }
            }
            Command::Submit { reply } => {
                let result = match &self.completed {
                    Some(submission) => Ok(submission.clone()),
                    None => self.finalize(FinalizeReason::Manual).await,
                };
                let _ = reply.send(result);
            }
        }
    }

    async fn handle_tick(&mut self) {
        match self.session.tick() {
            TickOutcome::Warning(warning) => {
                info!(remaining_seconds = warning.remaining_seconds, "Time warning");
            }
            TickOutcome::Expired => {
                if self.session.last_finalize_error().is_some() {
                    warn!("Retrying timed out submit");
                } else {
                    info!("Time is up, submitting");
                }
                let _ = self.finalize(FinalizeReason::Timeout).await;
            }
            TickOutcome::Continue | TickOutcome::Idle => {}
        }
    }

    /// Detached: an autosave in flight outlives the runner.
    fn spawn_autosave(&self, request: AutosaveRequest) {
        let lifecycle = self.lifecycle.clone();
        let reports = self.save_tx.clone();
        tokio::spawn(async move {
            let saved = match lifecycle.autosave(&request.submission_id, &request.answers).await {
                Ok(_) => true,
                Err(e) => {
                    warn!(
                        submission_id = %request.submission_id,
                        seq = request.seq,
                        error = %e,
                        "Autosave failed"
                    );
                    false
                }
            };
            let _ = reports.send(SaveReport {
                seq: request.seq,
                saved,
                at: now(),
            });
        });
    }

    async fn finalize(&mut self, reason: FinalizeReason) -> Result<Submission> {
        if let Some(submission) = &self.completed {
            return Ok(submission.clone());
        }
        let request = match self.session.begin_finalize(reason, now())? {
            Some(request) => request,
            None => return Err(Error::InvalidState("Submission already in progress".to_string())),
        };
        self.publish();

        match self
            .lifecycle
            .submit_patch(&request.submission_id, request.patch)
            .await
        {
            Ok(submission) => {
                self.session.complete_finalize(Ok(()));
                info!(
                    submission_id = %submission.id,
                    reason = ?request.reason,
                    total_score = ?submission.total_score,
                    max_score = submission.max_score,
                    time_spent_seconds = ?submission.time_spent_seconds,
                    "Submission finalized"
                );
                self.completed = Some(submission.clone());
                Ok(submission)
            }
            Err(e) => {
                error!(
                    submission_id = %request.submission_id,
                    reason = ?request.reason,
                    error = %e,
                    "Failed to finalize submission"
                );
                self.session.complete_finalize(Err(e.to_string()));
                Err(e)
            }
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.session.snapshot());
    }
}
