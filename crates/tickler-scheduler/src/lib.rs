//! `tickler-scheduler`: Tokio-based recurring trigger.
//!
//! # Overview
//!
//! A [`SchedulerEngine`] owns one [`Schedule`] and one [`ScheduledTask`]. It
//! sleeps until the next run, fires the task, and repeats until its
//! [`SchedulerHandle`] is stopped. Runs carry no state between them.
//!
//! # Schedule expressions
//!
//! | Expression        | Behaviour                                             |
//! |-------------------|-------------------------------------------------------|
//! | `m h dom mon dow` | Standard 5-field cron, evaluated in local time        |
//! | `@daily`          | Every day at 00:00 local (`@midnight` is an alias)    |
//! | `@hourly`         | Every hour on the hour                                |
//! | `@weekly`         | Sundays at 00:00 local                                |
//! | `@every 30m`      | Fixed interval; `ms`, `s`, `m`, `h` suffixes          |

pub mod cron;
pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use cron::CronExpr;
pub use engine::{ScheduledTask, SchedulerEngine, SchedulerHandle};
pub use error::{Result, SchedulerError};
pub use schedule::compute_next_run;
pub use types::Schedule;
