//! `tickler-reminder`: the pending-todos digest.
//!
//! [`ReminderJob::run`] is the single entry point for both triggers: the
//! scheduler fires it through [`ScheduledTask`](tickler_scheduler::ScheduledTask)
//! and `POST /notify` awaits it directly.

pub mod digest;
pub mod job;

pub use digest::format_digest;
pub use job::{Dispatch, ReminderJob, ReminderOutcome};
