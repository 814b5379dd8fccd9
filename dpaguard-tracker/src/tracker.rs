//! Tracker handle
//!
//! [`ReviewTracker`] is what a host holds while a review is processed. It
//! exposes the current [`TrackerView`] and forwards user actions to the
//! task that owns the session.

use dpaguard_core::domain::review::ReviewId;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::clipboard::{Clipboard, NoClipboard};
use crate::config::TrackerConfig;
use crate::error::TrackerError;
use crate::repository::JobRepository;
use crate::scheduler::poller::CompletionCallback;
use crate::scheduler::{Command, SessionPoller};
use crate::session::PollSession;
use crate::view::TrackerView;

const COMMAND_BUFFER: usize = 16;

/// Result of a restart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestartOutcome {
    /// The job was restarted and polling resumed
    Restarted,
    /// The start call failed; the message is also shown in the view
    Failed(String),
    /// Another restart is still waiting for the backend
    InProgress,
    /// The job already succeeded
    AlreadyCompleted,
}

/// Result of a diagnostics copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    Failed(String),
}

/// Handle to a running tracker
pub struct ReviewTracker {
    review_id: ReviewId,
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<TrackerView>,
    task: Option<JoinHandle<()>>,
}

impl ReviewTracker {
    /// Starts building a tracker for `review_id`
    pub fn builder(review_id: impl Into<ReviewId>, repository: Arc<dyn JobRepository>) -> TrackerBuilder {
        TrackerBuilder::new(review_id.into(), repository)
    }

    pub fn review_id(&self) -> &ReviewId {
        &self.review_id
    }

    /// Current view
    pub fn view(&self) -> TrackerView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every view change
    pub fn subscribe(&self) -> watch::Receiver<TrackerView> {
        self.view.clone()
    }

    /// Resumes polling after a pause
    ///
    /// A session that is not paused is left untouched.
    pub async fn retry(&self) -> Result<(), TrackerError> {
        self.send(Command::Retry).await
    }

    /// Re-triggers the analysis job
    pub async fn restart(&self) -> Result<RestartOutcome, TrackerError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::Restart(reply)).await?;
        outcome.await.map_err(|_| self.stopped())
    }

    /// Copies the session diagnostics to the clipboard
    ///
    /// A failed copy is reported in the view's notice and never affects
    /// polling.
    pub async fn copy_diagnostics(&self) -> Result<CopyOutcome, TrackerError> {
        let (reply, outcome) = oneshot::channel();
        self.send(Command::CopyDiagnostics(reply)).await?;
        outcome.await.map_err(|_| self.stopped())
    }

    /// Stops polling and cancels a pending completion notification
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown).await;
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("Tracker task for review {} ended: {}", self.review_id, e);
            }
        }
    }

    async fn send(&self, command: Command) -> Result<(), TrackerError> {
        self.commands.send(command).await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> TrackerError {
        TrackerError::Stopped(self.review_id.to_string())
    }
}

impl Drop for ReviewTracker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Builder for [`ReviewTracker`]
pub struct TrackerBuilder {
    review_id: ReviewId,
    repository: Arc<dyn JobRepository>,
    config: TrackerConfig,
    job_id: Option<String>,
    clipboard: Arc<dyn Clipboard>,
    on_completed: Option<CompletionCallback>,
}

impl TrackerBuilder {
    fn new(review_id: ReviewId, repository: Arc<dyn JobRepository>) -> Self {
        Self {
            review_id,
            repository,
            config: TrackerConfig::default(),
            job_id: None,
            clipboard: Arc::new(NoClipboard),
            on_completed: None,
        }
    }

    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// Job id already known from starting the review
    pub fn job_id(mut self, job_id: impl Into<String>) -> Self {
        self.job_id = Some(job_id.into());
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Called once, `completion_delay` after the job succeeds
    pub fn on_completed<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(ReviewId) + Send + 'static,
    {
        self.on_completed = Some(Box::new(callback));
        self
    }

    /// Spawns the tracking task; polling starts immediately
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(self) -> Result<ReviewTracker, TrackerError> {
        self.config.validate()?;

        let session = PollSession::new(self.review_id.clone(), self.job_id);
        let (view_tx, view_rx) = watch::channel(TrackerView::from_session(&session, None, 0));
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);

        let poller = SessionPoller::new(
            session,
            self.config,
            self.repository,
            self.clipboard,
            view_tx,
            self.on_completed,
        );
        let task = tokio::spawn(poller.run(commands_rx));

        Ok(ReviewTracker {
            review_id: self.review_id,
            commands: commands_tx,
            view: view_rx,
            task: Some(task),
        })
    }
}
