use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use feed_logging::{feed_debug, feed_error, feed_info};
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, PageSource, ReqwestPageSource};
use crate::{EngineEvent, FetchError, PhotoRecord, TimerGeneration};

/// Bounded retry for transient page failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 0,
            backoff: Duration::from_millis(500),
        }
    }
}

impl From<&FetchSettings> for RetryPolicy {
    fn from(settings: &FetchSettings) -> Self {
        Self {
            attempts: settings.retry_attempts,
            backoff: settings.retry_backoff,
        }
    }
}

enum EngineCommand {
    FetchPage { page: u32, limit: u32 },
    ScheduleTimer { generation: TimerGeneration, delay: Duration },
}

/// Runs page fetches and one-shot timers on a background tokio runtime.
///
/// Results come back as [`EngineEvent`]s through [`EngineHandle::try_recv`].
/// Dropping the handle (or calling [`EngineHandle::shutdown`]) cancels all
/// outstanding work; cancelled work reports nothing, and commands issued after
/// shutdown are dropped.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let retry = RetryPolicy::from(&settings);
        let source = ReqwestPageSource::new(settings)?;
        Ok(Self::with_source(Arc::new(source), retry))
    }

    pub fn with_source(source: Arc<dyn PageSource>, retry: RetryPolicy) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let worker_cancel = cancel.clone();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    feed_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut pending_timer: Option<AbortHandle> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::FetchPage { page, limit } => {
                        runtime.spawn(run_fetch(
                            source.clone(),
                            page,
                            limit,
                            retry,
                            worker_cancel.clone(),
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::ScheduleTimer { generation, delay } => {
                        if let Some(stale) = pending_timer.take() {
                            stale.abort();
                        }
                        let task = runtime.spawn(run_timer(
                            generation,
                            delay,
                            worker_cancel.clone(),
                            event_tx.clone(),
                        ));
                        pending_timer = Some(task.abort_handle());
                    }
                }
            }
            feed_debug!("Engine command channel closed");
        });

        Self {
            cmd_tx,
            event_rx,
            cancel,
        }
    }

    pub fn fetch_page(&self, page: u32, limit: u32) {
        if self.is_shut_down() {
            feed_debug!("Engine shut down; dropping fetch of page {}", page);
            return;
        }
        let _ = self.cmd_tx.send(EngineCommand::FetchPage { page, limit });
    }

    /// Schedules `TimerElapsed { generation }` after `delay`, replacing any pending timer.
    pub fn schedule_timer(&self, generation: TimerGeneration, delay: Duration) {
        if self.is_shut_down() {
            feed_debug!("Engine shut down; dropping timer {}", generation);
            return;
        }
        let _ = self
            .cmd_tx
            .send(EngineCommand::ScheduleTimer { generation, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn shutdown(&self) {
        if !self.cancel.is_cancelled() {
            feed_info!("Engine shutting down");
            self.cancel.cancel();
        }
    }

    fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn run_fetch(
    source: Arc<dyn PageSource>,
    page: u32,
    limit: u32,
    retry: RetryPolicy,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let result = tokio::select! {
        _ = cancel.cancelled() => {
            feed_debug!("Fetch of page {} cancelled", page);
            return;
        }
        result = fetch_with_retry(source.as_ref(), page, limit, retry) => result,
    };

    let event = match result {
        Ok(photos) => {
            feed_info!("Fetched page {} ({} records)", page, photos.len());
            EngineEvent::PageFetched { page, photos }
        }
        Err(error) => {
            feed_debug!("Fetch of page {} failed: {}", page, error);
            EngineEvent::PageFailed { page, error }
        }
    };
    let _ = event_tx.send(event);
}

async fn run_timer(
    generation: TimerGeneration,
    delay: Duration,
    cancel: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(delay) => {
            let _ = event_tx.send(EngineEvent::TimerElapsed { generation });
        }
    }
}

/// Fetches one page, retrying transient failures per `retry`.
pub async fn fetch_with_retry(
    source: &dyn PageSource,
    page: u32,
    limit: u32,
    retry: RetryPolicy,
) -> Result<Vec<PhotoRecord>, FetchError> {
    let mut attempt = 0;
    loop {
        match source.fetch_page(page, limit).await {
            Ok(photos) => return Ok(photos),
            Err(err) if err.is_transient() && attempt < retry.attempts => {
                attempt += 1;
                feed_info!(
                    "Page {} attempt {} failed ({}); retrying in {:?}",
                    page,
                    attempt,
                    err,
                    retry.backoff
                );
                tokio::time::sleep(retry.backoff).await;
            }
            Err(err) => return Err(err),
        }
    }
}
