use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use tracing::warn;

use crate::cron::CronExpr;
use crate::types::Schedule;

/// Upper bound on days scanned for a daily/weekly slot (a week plus DST slack).
const MAX_LOOKAHEAD_DAYS: u32 = 8;

/// Compute the next execution time for `schedule` strictly *after* `from`.
///
/// Wall-clock schedules (`Daily`, `Weekly`, `Cron`) are evaluated in `from`'s
/// time zone, so passing a `DateTime<Local>` gives local-time behaviour.
/// Returns `None` when the schedule cannot fire again (invalid cron, or an
/// expression with no matching date).
pub fn compute_next_run<Tz: TimeZone>(schedule: &Schedule, from: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    match schedule {
        Schedule::Interval { every_ms } => {
            Some(from.clone() + Duration::milliseconds(i64::try_from(*every_ms).ok()?))
        }

        Schedule::Daily { hour, minute } => {
            next_at_local_time(from, *hour as u32, *minute as u32, |_| true)
        }

        Schedule::Weekly { day, hour, minute } => {
            // `day` follows ISO weekday numbering: 0=Monday … 6=Sunday,
            // which matches chrono's `num_days_from_monday`.
            let target = *day as u32;
            next_at_local_time(from, *hour as u32, *minute as u32, |date| {
                date.weekday().num_days_from_monday() == target
            })
        }

        Schedule::Cron { expression } => match CronExpr::parse(expression) {
            Ok(expr) => expr.next_after(from),
            Err(e) => {
                warn!("cron schedule rejected; next_run will not be set: {e}");
                None
            }
        },
    }
}

/// First `hour:minute` local time after `from` on a day accepted by `matches_day`.
fn next_at_local_time<Tz: TimeZone>(
    from: &DateTime<Tz>,
    hour: u32,
    minute: u32,
    matches_day: impl Fn(NaiveDate) -> bool,
) -> Option<DateTime<Tz>> {
    let tz = from.timezone();
    let mut date = from.naive_local().date();
    for _ in 0..MAX_LOOKAHEAD_DAYS {
        if matches_day(date) {
            let naive = date.and_hms_opt(hour, minute, 0)?;
            // A time skipped by a DST jump has no instant; try the next day.
            if let Some(candidate) = tz.from_local_datetime(&naive).earliest() {
                if candidate > *from {
                    return Some(candidate);
                }
            }
        }
        date = date.succ_opt()?;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn interval_adds_duration() {
        let from = at(2026, 10, 15, 9, 0);
        let next = compute_next_run(&Schedule::Interval { every_ms: 90_000 }, &from).unwrap();
        assert_eq!(next, at(2026, 10, 15, 9, 1) + Duration::seconds(30));
    }

    #[test]
    fn daily_today_or_tomorrow() {
        let s = Schedule::Daily { hour: 9, minute: 0 };
        assert_eq!(
            compute_next_run(&s, &at(2026, 10, 15, 8, 59)).unwrap(),
            at(2026, 10, 15, 9, 0)
        );
        assert_eq!(
            compute_next_run(&s, &at(2026, 10, 15, 9, 0)).unwrap(),
            at(2026, 10, 16, 9, 0)
        );
    }

    #[test]
    fn weekly_targets_iso_weekday() {
        // 2026-10-15 is a Thursday (ISO day 3); Monday is day 0.
        let s = Schedule::Weekly {
            day: 0,
            hour: 9,
            minute: 0,
        };
        assert_eq!(
            compute_next_run(&s, &at(2026, 10, 15, 12, 0)).unwrap(),
            at(2026, 10, 19, 9, 0)
        );

        let thursday = Schedule::Weekly {
            day: 3,
            hour: 9,
            minute: 0,
        };
        assert_eq!(
            compute_next_run(&thursday, &at(2026, 10, 15, 9, 30)).unwrap(),
            at(2026, 10, 22, 9, 0)
        );
    }

    #[test]
    fn wall_clock_follows_the_time_zone_of_from() {
        // 09:00 in UTC+02:00 is 07:00 UTC.
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        let from = paris.with_ymd_and_hms(2026, 10, 15, 8, 0, 0).unwrap();
        let s: Schedule = "0 9 * * *".parse().unwrap();
        let next = compute_next_run(&s, &from).unwrap();
        assert_eq!(next.with_timezone(&Utc), at(2026, 10, 15, 7, 0));
    }

    #[test]
    fn invalid_cron_has_no_next_run() {
        let s = Schedule::Cron {
            expression: "not a cron".to_string(),
        };
        assert!(compute_next_run(&s, &at(2026, 10, 15, 9, 0)).is_none());
    }
}
