//! Calendar windows and day-bucketing.
//!
//! Windows are inclusive `[start, end]` instant pairs in UTC. Week
//! windows run Monday through Sunday (ISO weekday numbering); the
//! Sunday-first day names used by display breakdowns live in
//! [`metrics`](super::metrics), which is a deliberate mismatch carried
//! over from the existing API.

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::types::{Task, TaskStatus};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Inclusive `[start, end]` window used to scope queries and aggregates.
///
/// Constructors guarantee `start <= end`, so derived helpers like
/// [`TimeWindow::dates`] cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Monday 00:00:00 through Sunday 23:59:59.999 of the current week.
    pub fn current_week(clock: &dyn Clock) -> Self {
        let today = clock.today();
        let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
        let sunday = monday + Days::new(6);
        TimeWindow {
            start: start_of_day(monday),
            end: end_of_day(sunday),
        }
    }

    /// First through last calendar day of the current month.
    pub fn current_month(clock: &dyn Clock) -> Self {
        let today = clock.today();
        let first = today.with_day(1).unwrap();
        let first_of_next = if first.month() == 12 {
            NaiveDate::from_ymd_opt(first.year() + 1, 1, 1).unwrap()
        } else {
            NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1).unwrap()
        };
        let last = first_of_next.pred_opt().unwrap();
        TimeWindow {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    /// The last `n` calendar days including today: start is
    /// `today - (n - 1)` at midnight, end is today 23:59:59.999.
    pub fn last_n_days(clock: &dyn Clock, n: i64) -> Result<Self> {
        if n <= 0 {
            return Err(Error::InvalidArgument(format!(
                "day count must be positive, got {}",
                n
            )));
        }
        let today = clock.today();
        let start = today - Days::new((n - 1) as u64);
        Ok(TimeWindow {
            start: start_of_day(start),
            end: end_of_day(today),
        })
    }

    /// Window spanning two calendar dates, both inclusive.
    pub fn for_dates(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidArgument(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(TimeWindow {
            start: start_of_day(start),
            end: end_of_day(end),
        })
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }

    /// First calendar day of the window.
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Last calendar day of the window.
    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    /// Every calendar date in the window, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut current = self.start_date();
        let last = self.end_date();
        while current <= last {
            dates.push(current);
            current = current + Days::new(1);
        }
        dates
    }

    /// Number of calendar days in the window.
    pub fn day_count(&self) -> i64 {
        days_between(self.start_date(), self.end_date()) + 1
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999).unwrap().and_utc()
}

/// Every calendar date from `start` to `end` inclusive, ascending.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    Ok(TimeWindow::for_dates(start, end)?.dates())
}

/// Absolute difference between two dates in whole calendar days.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

/// Per-day task counts.
///
/// Statuses are parsed into [`TaskStatus`] before they reach this code,
/// so every counted task lands in exactly one sub-counter and
/// `completed + pending + in_progress == total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
}

impl DayBucket {
    fn add(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::InProgress => self.in_progress += 1,
        }
    }
}

/// Group tasks by the calendar day of their creation instant.
///
/// The returned map is ordered by date; callers that need "most recent
/// activity" or sorted iteration get it for free.
pub fn group_by_day<'a, I>(tasks: I) -> BTreeMap<NaiveDate, DayBucket>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut grouped: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for task in tasks {
        grouped
            .entry(task.created_at.date_naive())
            .or_default()
            .add(task.status);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::TaskPriority;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task_on(date: NaiveDate, status: TaskStatus) -> Task {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "u1".to_string(),
            title: "task".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: date.and_hms_opt(9, 30, 0).unwrap().and_utc(),
            updated_at: date.and_hms_opt(9, 30, 0).unwrap().and_utc(),
        }
    }

    #[test]
    fn test_current_week_is_monday_through_sunday() {
        // 2024-01-03 is a Wednesday
        let clock = FixedClock::at_date(ymd(2024, 1, 3));
        let window = TimeWindow::current_week(&clock);

        assert_eq!(window.start_date(), ymd(2024, 1, 1));
        assert_eq!(window.end_date(), ymd(2024, 1, 7));
        assert_eq!(window.start.time(), chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            window.end.time(),
            chrono::NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap()
        );
    }

    #[test]
    fn test_current_week_on_monday_and_sunday() {
        let monday = FixedClock::at_date(ymd(2024, 1, 1));
        let window = TimeWindow::current_week(&monday);
        assert_eq!(window.start_date(), ymd(2024, 1, 1));

        let sunday = FixedClock::at_date(ymd(2024, 1, 7));
        let window = TimeWindow::current_week(&sunday);
        assert_eq!(window.start_date(), ymd(2024, 1, 1));
        assert_eq!(window.end_date(), ymd(2024, 1, 7));
    }

    #[test]
    fn test_current_month_covers_whole_month() {
        let clock = FixedClock::at_date(ymd(2024, 2, 15));
        let window = TimeWindow::current_month(&clock);
        assert_eq!(window.start_date(), ymd(2024, 2, 1));
        // 2024 is a leap year
        assert_eq!(window.end_date(), ymd(2024, 2, 29));

        let december = FixedClock::at_date(ymd(2023, 12, 5));
        let window = TimeWindow::current_month(&december);
        assert_eq!(window.end_date(), ymd(2023, 12, 31));
    }

    #[test]
    fn test_last_n_days_includes_today() {
        let clock = FixedClock::at_date(ymd(2024, 3, 10));
        let window = TimeWindow::last_n_days(&clock, 7).unwrap();
        assert_eq!(window.start_date(), ymd(2024, 3, 4));
        assert_eq!(window.end_date(), ymd(2024, 3, 10));
        assert_eq!(window.day_count(), 7);

        let single = TimeWindow::last_n_days(&clock, 1).unwrap();
        assert_eq!(single.start_date(), ymd(2024, 3, 10));
    }

    #[test]
    fn test_last_n_days_rejects_non_positive() {
        let clock = FixedClock::at_date(ymd(2024, 3, 10));
        assert!(matches!(
            TimeWindow::last_n_days(&clock, 0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeWindow::last_n_days(&clock, -5),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_date_range_over_leap_day() {
        let dates = date_range(ymd(2024, 2, 28), ymd(2024, 3, 1)).unwrap();
        assert_eq!(dates, vec![ymd(2024, 2, 28), ymd(2024, 2, 29), ymd(2024, 3, 1)]);
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(matches!(
            date_range(ymd(2024, 3, 2), ymd(2024, 3, 1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_days_between_is_absolute_and_ignores_time() {
        assert_eq!(days_between(ymd(2024, 1, 1), ymd(2024, 1, 4)), 3);
        assert_eq!(days_between(ymd(2024, 1, 4), ymd(2024, 1, 1)), 3);
        assert_eq!(days_between(ymd(2024, 1, 1), ymd(2024, 1, 1)), 0);
    }

    #[test]
    fn test_group_by_day_counts_statuses() {
        let day = ymd(2024, 1, 5);
        let tasks = vec![
            task_on(day, TaskStatus::Completed),
            task_on(day, TaskStatus::Completed),
            task_on(day, TaskStatus::Pending),
            task_on(day, TaskStatus::InProgress),
            task_on(ymd(2024, 1, 6), TaskStatus::Pending),
        ];

        let grouped = group_by_day(&tasks);
        assert_eq!(grouped.len(), 2);

        let bucket = grouped[&day];
        assert_eq!(bucket.total, 4);
        assert_eq!(bucket.completed, 2);
        assert_eq!(bucket.pending, 1);
        assert_eq!(bucket.in_progress, 1);
        assert_eq!(
            bucket.completed + bucket.pending + bucket.in_progress,
            bucket.total
        );
    }

    #[test]
    fn test_group_by_day_empty_input() {
        assert!(group_by_day(&[]).is_empty());
    }

    #[test]
    fn test_day_bucket_serializes_camel_case() {
        let bucket = DayBucket {
            total: 3,
            completed: 1,
            pending: 1,
            in_progress: 1,
        };
        let value = serde_json::to_value(bucket).unwrap();
        assert!(value.get("inProgress").is_some());
    }
}
