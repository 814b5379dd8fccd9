//! Interactive job tracking
//!
//! Runs a tracker for one review, renders its checklist whenever something
//! visible changes and maps single-letter commands on stdin to tracker
//! actions.

use anyhow::{Context, Result, bail};
use colored::*;
use dpaguard_client::ReviewClient;
use dpaguard_core::domain::review::ReviewId;
use dpaguard_tracker::{CopyOutcome, HttpJobRepository, RestartOutcome, ReviewTracker, TrackerView};
use std::future;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::clipboard::SystemClipboard;
use crate::config::PollArgs;
use crate::render::{print_tracker_view, view_changed};

/// How a watch session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    Completed,
    Quit,
}

/// Action requested on stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Retry,
    Restart,
    Copy,
    Quit,
}

impl Key {
    fn parse(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "retry" => Some(Key::Retry),
            "s" | "restart" => Some(Key::Restart),
            "c" | "copy" => Some(Key::Copy),
            "q" | "quit" => Some(Key::Quit),
            _ => None,
        }
    }
}

/// Follow a review until its job succeeds or the user quits
pub async fn watch_review(
    client: Arc<ReviewClient>,
    review_id: ReviewId,
    job_id: Option<String>,
    poll: &PollArgs,
) -> Result<WatchOutcome> {
    let (completed_tx, mut completed_rx) = oneshot::channel();
    let repository = Arc::new(HttpJobRepository::new(client));

    let mut builder = ReviewTracker::builder(review_id, repository)
        .config(poll.tracker_config())
        .clipboard(Arc::new(SystemClipboard))
        .on_completed(move |review_id| {
            let _ = completed_tx.send(review_id);
        });
    if let Some(job_id) = job_id {
        builder = builder.job_id(job_id);
    }
    let tracker = builder.spawn().context("Failed to start tracking")?;

    let keys = spawn_key_reader();
    let interrupted = async {
        if tokio::signal::ctrl_c().await.is_err() {
            debug!("Ctrl-C handler unavailable");
            future::pending::<()>().await;
        }
    };
    let outcome = drive(&tracker, keys, &mut completed_rx, interrupted).await;
    tracker.shutdown().await;
    outcome
}

async fn drive(
    tracker: &ReviewTracker,
    mut keys: mpsc::Receiver<Key>,
    completed: &mut oneshot::Receiver<ReviewId>,
    interrupted: impl Future<Output = ()>,
) -> Result<WatchOutcome> {
    tokio::pin!(interrupted);
    let mut views = tracker.subscribe();
    let mut shown: Option<TrackerView> = None;
    let mut keys_open = true;
    render(&mut shown, views.borrow_and_update().clone());

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    bail!("Tracking of review {} stopped unexpectedly", tracker.review_id());
                }
                render(&mut shown, views.borrow_and_update().clone());
            }
            review_id = &mut *completed => match review_id {
                Ok(review_id) => {
                    println!("\n{} {}", "✓ Analysis complete for review".green().bold(), review_id);
                    return Ok(WatchOutcome::Completed);
                }
                Err(_) => bail!("Tracking of review {} stopped unexpectedly", tracker.review_id()),
            },
            key = keys.recv(), if keys_open => match key {
                Some(Key::Quit) => return Ok(WatchOutcome::Quit),
                Some(key) => handle_key(tracker, key).await?,
                // Without stdin the job is still followed to the end.
                None => keys_open = false,
            },
            _ = &mut interrupted => return Ok(WatchOutcome::Quit),
        }
    }
}

async fn handle_key(tracker: &ReviewTracker, key: Key) -> Result<()> {
    match key {
        Key::Retry => {
            if tracker.view().paused {
                tracker.retry().await?;
            } else {
                println!("{}", "Nothing to retry.".dimmed());
            }
        }
        Key::Restart => match tracker.restart().await? {
            RestartOutcome::Restarted => println!("{}", "✓ Job restarted".green()),
            RestartOutcome::Failed(_) => {}
            RestartOutcome::InProgress => println!("{}", "A restart is already in progress.".dimmed()),
            RestartOutcome::AlreadyCompleted => {
                println!("{}", "The analysis already completed.".dimmed())
            }
        },
        Key::Copy => {
            if let CopyOutcome::Failed(reason) = tracker.copy_diagnostics().await? {
                debug!("Diagnostics copy failed: {}", reason);
            }
        }
        Key::Quit => {}
    }
    Ok(())
}

fn render(shown: &mut Option<TrackerView>, view: TrackerView) {
    if view_changed(shown.as_ref(), &view) {
        print_tracker_view(&view);
        *shown = Some(view);
    }
}

/// Forwards recognised stdin lines until stdin closes
///
/// Reads on a plain thread: a pending read must not keep the runtime from
/// shutting down once the watch ends.
fn spawn_key_reader() -> mpsc::Receiver<Key> {
    let (tx, rx) = mpsc::channel(8);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            match Key::parse(&line) {
                Some(key) => {
                    if tx.blocking_send(key).is_err() {
                        break;
                    }
                }
                None => debug!("Ignoring input {:?}", line),
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn idle_tracker() -> ReviewTracker {
        let client = Arc::new(ReviewClient::new("http://127.0.0.1:9"));
        ReviewTracker::builder("review-1", Arc::new(HttpJobRepository::new(client)))
            .spawn()
            .unwrap()
    }

    #[tokio::test]
    async fn test_interrupt_ends_watch_after_stdin_closes() {
        let tracker = idle_tracker();
        let (keys_tx, keys) = mpsc::channel(1);
        drop(keys_tx);
        let (_completed_tx, mut completed) = oneshot::channel::<ReviewId>();
        let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = interrupt_tx.send(());
        });

        let outcome = drive(&tracker, keys, &mut completed, async {
            let _ = interrupt_rx.await;
        })
        .await
        .unwrap();

        assert_eq!(outcome, WatchOutcome::Quit);
        tracker.shutdown().await;
    }

    #[tokio::test]
    async fn test_quit_key_ends_watch() {
        let tracker = idle_tracker();
        let (keys_tx, keys) = mpsc::channel(1);
        keys_tx.send(Key::Quit).await.unwrap();
        let (_completed_tx, mut completed) = oneshot::channel::<ReviewId>();

        let outcome = drive(&tracker, keys, &mut completed, future::pending())
            .await
            .unwrap();

        assert_eq!(outcome, WatchOutcome::Quit);
        tracker.shutdown().await;
    }

    #[test]
    fn test_key_parsing() {
        assert_eq!(Key::parse("r"), Some(Key::Retry));
        assert_eq!(Key::parse(" S \n"), Some(Key::Restart));
        assert_eq!(Key::parse("copy"), Some(Key::Copy));
        assert_eq!(Key::parse("q"), Some(Key::Quit));
        assert_eq!(Key::parse("x"), None);
    }
}
