use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{error::Result, schedule::compute_next_run, types::Schedule};

/// Work the engine performs each time the schedule comes due.
///
/// `fire` returns nothing: the task is expected to log its own outcome, and a
/// failed run must not stop later runs.
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    async fn fire(&self);
}

/// Drives one task on one schedule, in local time.
pub struct SchedulerEngine {
    schedule: Schedule,
    task: Arc<dyn ScheduledTask>,
}

impl SchedulerEngine {
    /// Create a new engine. Fails if the schedule cannot be evaluated.
    pub fn new(schedule: Schedule, task: Arc<dyn ScheduledTask>) -> Result<Self> {
        schedule.validate()?;
        Ok(Self { schedule, task })
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// The next local instant the task would fire after `from`.
    pub fn next_run_after(&self, from: &DateTime<Local>) -> Option<DateTime<Local>> {
        compute_next_run(&self.schedule, from)
    }

    /// Run the engine on a background task and return a handle that stops it.
    pub fn spawn(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(self.run(shutdown_rx));
        SchedulerHandle {
            shutdown: shutdown_tx,
            join,
        }
    }

    /// Main event loop. Sleeps until the next run until `shutdown` broadcasts `true`.
    ///
    /// A run that is still executing when shutdown is signalled completes
    /// first; the loop checks for shutdown between runs.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(schedule = %self.schedule, task = self.task.name(), "scheduler engine started");

        let mut from = Local::now();
        loop {
            let Some(next) = self.next_run_after(&from) else {
                warn!(schedule = %self.schedule, "schedule has no future run; idling until shutdown");
                while shutdown.changed().await.is_ok() {
                    if *shutdown.borrow() {
                        break;
                    }
                }
                break;
            };
            info!(next_run = %next.to_rfc3339(), task = self.task.name(), "next run scheduled");

            let wait = (next - Local::now()).to_std().unwrap_or(Duration::ZERO);
            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    info!(task = self.task.name(), "executing scheduled task");
                    self.task.fire().await;
                    // Never schedule from before the slot that just fired,
                    // and skip slots missed while the task was running.
                    let now = Local::now();
                    from = if now > next { now } else { next };
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("scheduler engine shutting down");
    }
}

/// Owned by the process; stopping it ends the engine loop deterministically.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Signal shutdown and wait for the engine task to exit.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.join.await {
            error!("scheduler engine task failed: {e}");
        }
    }
}
