use std::fmt;
use std::str::FromStr;

use crate::cron::CronExpr;
use crate::error::SchedulerError;

/// Defines when and how often the scheduled task should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    /// Run repeatedly with a fixed interval.
    Interval { every_ms: u64 },

    /// Run every day at the given local hour and minute.
    Daily { hour: u8, minute: u8 },

    /// Run on a specific weekday (0 = Monday … 6 = Sunday) at the given local time.
    Weekly { day: u8, hour: u8, minute: u8 },

    /// Run according to a 5-field cron expression.
    Cron { expression: String },
}

impl Schedule {
    /// Check that the schedule can produce run times.
    pub fn validate(&self) -> crate::error::Result<()> {
        match self {
            Schedule::Interval { every_ms: 0 } => Err(SchedulerError::InvalidSchedule(
                "interval must be greater than zero".to_string(),
            )),
            Schedule::Interval { .. } => Ok(()),
            Schedule::Daily { hour, minute } | Schedule::Weekly { hour, minute, .. }
                if *hour > 23 || *minute > 59 =>
            {
                Err(SchedulerError::InvalidSchedule(format!(
                    "time {hour:02}:{minute:02} is out of range"
                )))
            }
            Schedule::Weekly { day, .. } if *day > 6 => Err(SchedulerError::InvalidSchedule(
                format!("weekday {day} is out of range (0 = Monday … 6 = Sunday)"),
            )),
            Schedule::Daily { .. } | Schedule::Weekly { .. } => Ok(()),
            Schedule::Cron { expression } => CronExpr::parse(expression).map(|_| ()),
        }
    }
}

impl FromStr for Schedule {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let schedule = match s {
            "@daily" | "@midnight" => Schedule::Daily { hour: 0, minute: 0 },
            "@weekly" => Schedule::Weekly {
                day: 6,
                hour: 0,
                minute: 0,
            },
            "@hourly" => Schedule::Cron {
                expression: "0 * * * *".to_string(),
            },
            _ => {
                if let Some(spec) = s.strip_prefix("@every") {
                    Schedule::Interval {
                        every_ms: parse_interval_ms(spec.trim())?,
                    }
                } else if s.starts_with('@') {
                    return Err(SchedulerError::InvalidSchedule(format!(
                        "unknown schedule macro: {s}"
                    )));
                } else {
                    Schedule::Cron {
                        expression: s.to_string(),
                    }
                }
            }
        };
        schedule.validate()?;
        Ok(schedule)
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Interval { every_ms } => write!(f, "every {every_ms}ms"),
            Schedule::Daily { hour, minute } => write!(f, "daily at {hour:02}:{minute:02}"),
            Schedule::Weekly { day, hour, minute } => {
                write!(f, "weekly on day {day} at {hour:02}:{minute:02}")
            }
            Schedule::Cron { expression } => write!(f, "cron '{expression}'"),
        }
    }
}

/// Parse `500ms`, `30s`, `15m`, `2h`, or a bare number of seconds.
fn parse_interval_ms(spec: &str) -> crate::error::Result<u64> {
    let invalid = || SchedulerError::InvalidSchedule(format!("bad interval: '{spec}'"));

    let split = spec
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(spec.len());
    let (digits, unit) = spec.split_at(split);
    let n: u64 = digits.parse().map_err(|_| invalid())?;
    let factor = match unit.trim() {
        "ms" => 1,
        "" | "s" => 1_000,
        "m" => 60_000,
        "h" => 3_600_000,
        _ => return Err(invalid()),
    };
    n.checked_mul(factor).ok_or_else(invalid)
}
