//! Auto-refresh as an owned task.
//!
//! [`Poller::start`] spawns a task that fetches immediately and then once per
//! interval, pushing each result to the returned [`PollHandle`]. The task
//! stops when the handle is stopped or dropped, whichever comes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::StatusSource;
use crate::error::{Error, Result};
use crate::model::Request;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

/// One refresh: the listing, or why it could not be fetched.
pub type PollUpdate = Result<Vec<Request>>;

pub struct Poller<S> {
    source: Arc<S>,
    interval: Duration,
}

impl<S: StatusSource + 'static> Poller<S> {
    /// Fails with [`Error::Config`] on a zero interval.
    pub fn new(source: Arc<S>, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::Config(
                "poll interval must be greater than zero".to_string(),
            ));
        }
        Ok(Self { source, interval })
    }

    pub fn start(self) -> PollHandle {
        let cancel = CancellationToken::new();
        let (tx, rx) = mpsc::channel(8);
        let task = tokio::spawn(run(self.source, self.interval, cancel.clone(), tx));
        debug!(interval_ms = self.interval.as_millis() as u64, "auto-refresh started");
        PollHandle {
            cancel,
            task: Some(task),
            updates: rx,
        }
    }
}

async fn run<S: StatusSource>(
    source: Arc<S>,
    interval: Duration,
    cancel: CancellationToken,
    tx: mpsc::Sender<PollUpdate>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let update = tokio::select! {
            _ = cancel.cancelled() => break,
            update = source.fetch() => update,
        };
        if let Err(ref e) = update {
            warn!(error = %e, "refresh failed");
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            sent = tx.send(update) => {
                if sent.is_err() {
                    break;
                }
            }
        }
    }
    debug!("auto-refresh stopped");
}

/// Handle to a running poller. Dropping it cancels the task.
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    updates: mpsc::Receiver<PollUpdate>,
}

impl PollHandle {
    /// Next refresh result. `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<PollUpdate> {
        self.updates.recv().await
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the task and wait for it to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
