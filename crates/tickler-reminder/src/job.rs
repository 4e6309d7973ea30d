use std::sync::Arc;

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use tickler_core::config::DEFAULT_DATE_FORMAT;
use tickler_notify::NotificationSink;
use tickler_scheduler::ScheduledTask;
use tickler_store::{StoreError, TodoStore};
use tracing::{error, info, warn};

use crate::digest::format_digest;

/// What happened to the digest on one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing pending, so nothing was sent.
    Skipped,
    /// The sink accepted the message.
    Delivered,
    /// The sink reported an error; the run itself still succeeded.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderOutcome {
    /// Number of incomplete todos found.
    pub pending: usize,
    pub dispatch: Dispatch,
}

impl ReminderOutcome {
    /// True only when the sink accepted the digest.
    pub fn sent(&self) -> bool {
        matches!(self.dispatch, Dispatch::Delivered)
    }

    /// One-line human-readable result, used in the `/notify` response.
    pub fn summary(&self) -> String {
        match &self.dispatch {
            Dispatch::Skipped => "No pending todos, reminder not sent".to_string(),
            Dispatch::Delivered => format!("Reminder sent ({} pending)", self.pending),
            Dispatch::Failed(reason) => format!("Reminder dispatch failed: {reason}"),
        }
    }
}

/// Compiles the pending-todos digest and pushes it through the sink.
///
/// Stateless between runs: every run re-reads the store. No dedup or rate
/// limiting, so two runs in a row send two identical messages.
pub struct ReminderJob {
    store: Arc<TodoStore>,
    sink: Arc<dyn NotificationSink>,
    date_format: String,
}

impl ReminderJob {
    /// `date_format` is a chrono strftime pattern; an invalid one falls back to
    /// `%d/%m/%Y`.
    pub fn new(store: Arc<TodoStore>, sink: Arc<dyn NotificationSink>, date_format: &str) -> Self {
        let date_format = if is_valid_format(date_format) {
            date_format.to_string()
        } else {
            warn!(date_format, "invalid reminder date format, using {DEFAULT_DATE_FORMAT}");
            DEFAULT_DATE_FORMAT.to_string()
        };
        Self {
            store,
            sink,
            date_format,
        }
    }

    /// Read the incomplete todos and dispatch a digest if there are any.
    ///
    /// Store failures are returned; sink failures are logged and reported in
    /// the outcome, never as an `Err`.
    pub async fn run(&self) -> Result<ReminderOutcome, StoreError> {
        let pending = self.store.list_by_status(false)?;
        if pending.is_empty() {
            info!("no pending todos; reminder skipped");
            return Ok(ReminderOutcome {
                pending: 0,
                dispatch: Dispatch::Skipped,
            });
        }

        let today = Local::now().format(&self.date_format).to_string();
        let message = format_digest(&pending, &today);

        let dispatch = match self.sink.send(&message).await {
            Ok(()) => {
                info!(pending = pending.len(), sink = self.sink.name(), "reminder sent");
                Dispatch::Delivered
            }
            Err(e) => {
                warn!(pending = pending.len(), sink = self.sink.name(), error = %e, "reminder dispatch failed");
                Dispatch::Failed(e.to_string())
            }
        };

        Ok(ReminderOutcome {
            pending: pending.len(),
            dispatch,
        })
    }
}

#[async_trait]
impl ScheduledTask for ReminderJob {
    fn name(&self) -> &str {
        "daily-reminder"
    }

    async fn fire(&self) {
        match self.run().await {
            Ok(outcome) => info!(pending = outcome.pending, sent = outcome.sent(), "scheduled reminder finished"),
            Err(e) => error!(error = %e, "scheduled reminder could not read todos"),
        }
    }
}

fn is_valid_format(fmt: &str) -> bool {
    !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}
