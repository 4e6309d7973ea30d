//! Five-field cron expressions: `minute hour day-of-month month day-of-week`.
//!
//! Each field accepts `*`, a number, a range `a-b`, a step `*/n` or `a-b/n`,
//! and comma-separated lists of those. Months and weekdays also accept
//! three-letter English names (`jan`, `mon`). Day-of-week runs 0–7 with both 0
//! and 7 meaning Sunday.
//!
//! When day-of-month and day-of-week are both restricted, a day matches if
//! *either* field matches (classic cron behaviour).

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike};

use crate::error::{Result, SchedulerError};

/// How far ahead `next_after` searches before giving up (covers leap-day expressions).
const MAX_LOOKAHEAD_DAYS: u32 = 366 * 5;

const MONTH_NAMES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];
const WEEKDAY_NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

/// A parsed cron expression. Each field is a bitset of allowed values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpr {
    minutes: u64,
    hours: u32,
    days_of_month: u32,
    months: u16,
    days_of_week: u8,
    dom_restricted: bool,
    dow_restricted: bool,
}

impl CronExpr {
    pub fn parse(expression: &str) -> Result<Self> {
        let fields: Vec<&str> = expression.split_whitespace().collect();
        let &[minute, hour, dom, month, dow] = fields.as_slice() else {
            return Err(SchedulerError::InvalidSchedule(format!(
                "cron expression needs 5 fields, got {}: '{expression}'",
                fields.len()
            )));
        };

        let mut days_of_week = parse_field(dow, 0, 7, &WEEKDAY_NAMES)?;
        // 7 is an alias for Sunday.
        if days_of_week & (1 << 7) != 0 {
            days_of_week = (days_of_week | 1) & !(1 << 7);
        }

        Ok(Self {
            minutes: parse_field(minute, 0, 59, &[])?,
            hours: parse_field(hour, 0, 23, &[])? as u32,
            days_of_month: parse_field(dom, 1, 31, &[])? as u32,
            months: parse_field(month, 1, 12, &MONTH_NAMES)? as u16,
            days_of_week: days_of_week as u8,
            dom_restricted: !dom.starts_with('*'),
            dow_restricted: !dow.starts_with('*'),
        })
    }

    /// First matching instant strictly after `from`, in `from`'s time zone.
    ///
    /// Local times skipped by a DST jump never match; a time that occurs twice
    /// resolves to its earlier occurrence. Returns `None` when nothing matches
    /// within five years (e.g. `0 0 30 2 *`).
    pub fn next_after<Tz: TimeZone>(&self, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = from.timezone();
        let start = from
            .naive_local()
            .with_second(0)?
            .with_nanosecond(0)?
            + Duration::minutes(1);

        let mut date = start.date();
        for _ in 0..MAX_LOOKAHEAD_DAYS {
            if self.day_matches(date) {
                let first_day = date == start.date();
                let min_hour = if first_day { start.hour() } else { 0 };
                for hour in min_hour..24 {
                    if self.hours & (1 << hour) == 0 {
                        continue;
                    }
                    let min_minute = if first_day && hour == start.hour() {
                        start.minute()
                    } else {
                        0
                    };
                    for minute in min_minute..60 {
                        if self.minutes & (1 << minute) == 0 {
                            continue;
                        }
                        let naive = date.and_hms_opt(hour, minute, 0)?;
                        if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
                            if candidate > *from {
                                return Some(candidate);
                            }
                        }
                    }
                }
            }
            date = date.succ_opt()?;
        }
        None
    }

    fn day_matches(&self, date: NaiveDate) -> bool {
        if self.months & (1 << date.month()) == 0 {
            return false;
        }
        let dom = self.days_of_month & (1 << date.day()) != 0;
        let dow = self.days_of_week & (1 << date.weekday().num_days_from_sunday()) != 0;
        match (self.dom_restricted, self.dow_restricted) {
            (true, true) => dom || dow,
            (true, false) => dom,
            (false, true) => dow,
            (false, false) => true,
        }
    }
}

/// Parse one cron field into a bitset where bit `n` means value `n` is allowed.
fn parse_field(field: &str, min: u32, max: u32, names: &[&str]) -> Result<u64> {
    let invalid = |why: &str| SchedulerError::InvalidSchedule(format!("cron field '{field}': {why}"));

    let mut bits = 0u64;
    for part in field.split(',') {
        let (range, step) = match part.split_once('/') {
            Some((range, step)) => {
                let step: u32 = step.parse().map_err(|_| invalid("bad step"))?;
                if step == 0 || step > max {
                    return Err(invalid(&format!("step must lie within 1-{max}")));
                }
                (range, step)
            }
            None => (part, 1),
        };

        let (lo, hi) = if range == "*" {
            (min, max)
        } else if let Some((a, b)) = range.split_once('-') {
            (value(a, min, names)?, value(b, min, names)?)
        } else {
            let v = value(range, min, names)?;
            // `5/15` means "from 5 to the end, every 15".
            if part.contains('/') {
                (v, max)
            } else {
                (v, v)
            }
        };

        if lo < min || hi > max || lo > hi {
            return Err(invalid(&format!("values must lie within {min}-{max}")));
        }
        let mut v = lo;
        while v <= hi {
            bits |= 1 << v;
            v += step;
        }
    }
    Ok(bits)
}

fn value(token: &str, min: u32, names: &[&str]) -> Result<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return Ok(n);
    }
    let lower = token.to_ascii_lowercase();
    names
        .iter()
        .position(|name| *name == lower)
        .map(|i| i as u32 + min)
        .ok_or_else(|| SchedulerError::InvalidSchedule(format!("unknown cron value '{token}'")))
}
