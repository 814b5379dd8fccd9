//! Session poller
//!
//! Drives a [`PollSession`]: issues status queries on every scheduler tick,
//! applies their results and the host's commands, and republishes the view
//! after each transition.
//!
//! Every call the poller starts lives in its own [`JoinSet`] and the
//! completion delay is a timer polled by the same loop, so dropping the
//! poller cancels all of them.

use dpaguard_client::{ClientError, format_error};
use dpaguard_core::domain::job::JobStatus;
use dpaguard_core::domain::review::ReviewId;
use dpaguard_core::dto::review::StartReviewResponse;
use std::future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinSet;
use tokio::time::{self, Sleep};
use tracing::{debug, info, warn};

use super::ticker::PollScheduler;
use crate::clipboard::Clipboard;
use crate::config::TrackerConfig;
use crate::repository::JobRepository;
use crate::session::{Directive, PollSession, RestartRejection};
use crate::tracker::{CopyOutcome, RestartOutcome};
use crate::view::{Diagnostics, TrackerView};

pub const COPIED_NOTICE: &str = "Diagnostics copied to clipboard.";
pub const COPY_FAILED_NOTICE: &str = "Unable to copy diagnostics.";

/// Completion callback supplied by the host
pub type CompletionCallback = Box<dyn FnOnce(ReviewId) + Send + 'static>;

/// Host requests handled by the poller
pub enum Command {
    Retry,
    Restart(oneshot::Sender<RestartOutcome>),
    CopyDiagnostics(oneshot::Sender<CopyOutcome>),
    Shutdown,
}

/// Results of spawned calls
enum Event {
    Status {
        generation: u64,
        result: Result<JobStatus, ClientError>,
    },
    Restarted {
        result: Result<StartReviewResponse, ClientError>,
        reply: oneshot::Sender<RestartOutcome>,
    },
    Copied {
        result: Result<(), String>,
        reply: oneshot::Sender<CopyOutcome>,
    },
}

pub struct SessionPoller {
    session: PollSession,
    config: TrackerConfig,
    repository: Arc<dyn JobRepository>,
    clipboard: Arc<dyn Clipboard>,
    scheduler: PollScheduler,
    view: watch::Sender<TrackerView>,
    calls: JoinSet<Event>,
    /// Generation of the status query still outstanding
    in_flight: Option<u64>,
    completion: Option<Pin<Box<Sleep>>>,
    on_completed: Option<CompletionCallback>,
    notice: Option<String>,
    queries_issued: u64,
}

impl SessionPoller {
    pub fn new(
        session: PollSession,
        config: TrackerConfig,
        repository: Arc<dyn JobRepository>,
        clipboard: Arc<dyn Clipboard>,
        view: watch::Sender<TrackerView>,
        on_completed: Option<CompletionCallback>,
    ) -> Self {
        let scheduler = PollScheduler::new(config.poll_interval);
        Self {
            session,
            config,
            repository,
            clipboard,
            scheduler,
            view,
            calls: JoinSet::new(),
            in_flight: None,
            completion: None,
            on_completed,
            notice: None,
            queries_issued: 0,
        }
    }

    /// Runs until shutdown or until every command sender is dropped
    pub async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        info!(
            "Tracking review {} (interval: {:?}, threshold: {})",
            self.session.review_id(),
            self.config.poll_interval,
            self.config.failure_threshold
        );

        self.scheduler.start();
        self.publish();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(joined) = self.calls.join_next() => match joined {
                    Ok(event) => self.handle_event(event),
                    Err(e) => warn!(
                        "Call for review {} did not finish: {}",
                        self.session.review_id(),
                        e
                    ),
                },
                _ = self.scheduler.tick() => self.issue_query(),
                _ = completion_due(&mut self.completion) => self.complete(),
            }
        }

        self.teardown();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Retry => self.retry(),
            Command::Restart(reply) => self.restart(reply),
            Command::CopyDiagnostics(reply) => self.copy_diagnostics(reply),
            Command::Shutdown => {}
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Status { generation, result } => self.apply_status(generation, result),
            Event::Restarted { result, reply } => self.apply_restart(result, reply),
            Event::Copied { result, reply } => self.apply_copy(result, reply),
        }
    }

    fn issue_query(&mut self) {
        if !self.session.is_active() {
            self.scheduler.stop();
            return;
        }

        let generation = self.session.generation();
        if self.in_flight == Some(generation) {
            debug!(
                "Status query for review {} still in flight, skipping tick",
                self.session.review_id()
            );
            return;
        }

        self.queries_issued += 1;
        debug!(
            "Querying job status for review {} (generation {})",
            self.session.review_id(),
            generation
        );

        let repository = Arc::clone(&self.repository);
        let review_id = self.session.review_id().clone();
        self.calls.spawn(async move {
            let result = repository.job_status(&review_id).await;
            Event::Status { generation, result }
        });
        self.in_flight = Some(generation);
    }

    fn apply_status(&mut self, generation: u64, result: Result<JobStatus, ClientError>) {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
        }

        if !self.session.accepts(generation) {
            debug!(
                "Discarding stale status for review {} (generation {}, current {})",
                self.session.review_id(),
                generation,
                self.session.generation()
            );
            return;
        }

        let directive = match result {
            Ok(status) => self.session.on_status(status),
            Err(e) => self
                .session
                .on_transport_failure(format_error(&e), self.config.failure_threshold),
        };
        self.apply(directive);
        self.publish();
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::Continue => {}
            Directive::Pause => self.scheduler.stop(),
            Directive::Complete => {
                self.scheduler.stop();
                self.schedule_completion();
            }
        }
    }

    fn schedule_completion(&mut self) {
        if self.on_completed.is_none() || self.completion.is_some() {
            return;
        }
        self.completion = Some(Box::pin(time::sleep(self.config.completion_delay)));
    }

    fn complete(&mut self) {
        self.completion = None;
        let review_id = self.session.review_id().clone();
        info!("Review {} completed", review_id);
        if let Some(callback) = self.on_completed.take() {
            callback(review_id);
        }
    }

    fn retry(&mut self) {
        if self.session.resume() {
            self.scheduler.start();
            self.publish();
        } else {
            debug!(
                "Retry ignored for review {}: polling is not paused",
                self.session.review_id()
            );
        }
    }

    fn restart(&mut self, reply: oneshot::Sender<RestartOutcome>) {
        match self.session.begin_restart() {
            Err(RestartRejection::Completed) => {
                let _ = reply.send(RestartOutcome::AlreadyCompleted);
                return;
            }
            Err(RestartRejection::InProgress) => {
                let _ = reply.send(RestartOutcome::InProgress);
                return;
            }
            Ok(()) => {}
        }

        info!("Restarting job for review {}", self.session.review_id());
        self.publish();

        let repository = Arc::clone(&self.repository);
        let review_id = self.session.review_id().clone();
        self.calls.spawn(async move {
            let result = repository.start_job(&review_id).await;
            Event::Restarted { result, reply }
        });
    }

    fn apply_restart(
        &mut self,
        result: Result<StartReviewResponse, ClientError>,
        reply: oneshot::Sender<RestartOutcome>,
    ) {
        let outcome = match result {
            Ok(response) => match self.session.restart_succeeded(response.job_id) {
                Ok(()) => {
                    self.scheduler.start();
                    RestartOutcome::Restarted
                }
                // The job succeeded while the start call was in flight.
                Err(_) => RestartOutcome::AlreadyCompleted,
            },
            Err(e) => {
                let message = format_error(&e);
                self.session.restart_failed(message.clone());
                RestartOutcome::Failed(message)
            }
        };

        self.publish();
        let _ = reply.send(outcome);
    }

    /// Writes the diagnostics on the blocking pool so a slow clipboard never
    /// holds up polling
    fn copy_diagnostics(&mut self, reply: oneshot::Sender<CopyOutcome>) {
        let text = match Diagnostics::from_session(&self.session).to_pretty_json() {
            Ok(text) => text,
            Err(e) => {
                self.apply_copy(Err(e.to_string()), reply);
                return;
            }
        };

        let clipboard = Arc::clone(&self.clipboard);
        self.calls.spawn(async move {
            let result = tokio::task::spawn_blocking(move || clipboard.write_text(&text))
                .await
                .map_err(|e| e.to_string())
                .and_then(|written| written.map_err(|e| e.to_string()));
            Event::Copied { result, reply }
        });
    }

    fn apply_copy(&mut self, result: Result<(), String>, reply: oneshot::Sender<CopyOutcome>) {
        let outcome = match result {
            Ok(()) => {
                self.notice = Some(COPIED_NOTICE.to_string());
                CopyOutcome::Copied
            }
            Err(reason) => {
                warn!(
                    "Failed to copy diagnostics for review {}: {}",
                    self.session.review_id(),
                    reason
                );
                self.notice = Some(COPY_FAILED_NOTICE.to_string());
                CopyOutcome::Failed(reason)
            }
        };

        self.publish();
        let _ = reply.send(outcome);
    }

    fn publish(&self) {
        self.view.send_replace(TrackerView::from_session(
            &self.session,
            self.notice.clone(),
            self.queries_issued,
        ));
    }

    fn teardown(&mut self) {
        if self.scheduler.is_running() {
            debug!(
                "Stopping status polling for review {}",
                self.session.review_id()
            );
            self.scheduler.stop();
        }
        self.in_flight = None;
        self.calls.abort_all();
        if self.completion.take().is_some() {
            debug!(
                "Cancelling pending completion for review {}",
                self.session.review_id()
            );
        }
        if self.session.restarting() {
            warn!(
                "Review {} shut down with a restart in flight",
                self.session.review_id()
            );
        }
        info!("Stopped tracking review {}", self.session.review_id());
    }
}

/// Resolves when the completion delay has elapsed; pending while none is set
async fn completion_due(deadline: &mut Option<Pin<Box<Sleep>>>) {
    match deadline {
        Some(sleep) => sleep.as_mut().await,
        None => future::pending().await,
    }
}
