//! Completion streak calculation.
//!
//! Consumes the full grouped-by-day history of a user, not just a
//! requested window: the longest streak has to see everything.

use crate::analytics::calendar::DayBucket;
use crate::clock::Clock;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Current and longest consecutive-day completion streaks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakSummary {
    /// Consecutive days with at least one completion, ending today or
    /// yesterday
    pub current_streak: i64,
    /// Longest such run anywhere in the history
    pub longest_streak: i64,
    /// Most recent day with any activity, completed or not
    pub last_activity_date: Option<NaiveDate>,
    /// Whether the current streak is still alive (completion today or
    /// yesterday)
    pub streak_active: bool,
}

/// Calculate streaks from grouped daily buckets.
///
/// A day qualifies when its bucket has `completed > 0`. The current
/// streak anchors at today if today qualifies, else at yesterday; a
/// qualifying day before a one-day gap does not keep the streak alive.
pub fn calculate(buckets: &BTreeMap<NaiveDate, DayBucket>, clock: &dyn Clock) -> StreakSummary {
    if buckets.is_empty() {
        return StreakSummary::default();
    }

    let today = clock.today();
    let yesterday = today - Days::new(1);

    let completed_on = |date: NaiveDate| buckets.get(&date).is_some_and(|b| b.completed > 0);

    let (streak_active, anchor) = if completed_on(today) {
        (true, today)
    } else if completed_on(yesterday) {
        (true, yesterday)
    } else {
        (false, today)
    };

    let mut current_streak = 0;
    if streak_active {
        let mut check = anchor;
        while completed_on(check) {
            current_streak += 1;
            check = check - Days::new(1);
        }
    }

    // Longest streak: run-length over the ascending qualifying dates.
    let mut longest_streak = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for (&date, bucket) in buckets {
        if bucket.completed == 0 {
            continue;
        }
        run = match previous {
            Some(prev) if (date - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        previous = Some(date);
    }

    StreakSummary {
        current_streak,
        longest_streak,
        last_activity_date: buckets.keys().next_back().copied(),
        streak_active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bucket(completed: i64) -> DayBucket {
        DayBucket {
            total: completed.max(1),
            completed,
            pending: 0,
            in_progress: 0,
        }
    }

    fn buckets(days: &[(NaiveDate, i64)]) -> BTreeMap<NaiveDate, DayBucket> {
        days.iter().map(|&(d, c)| (d, bucket(c))).collect()
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let clock = FixedClock::at_date(ymd(2024, 1, 3));
        let summary = calculate(&BTreeMap::new(), &clock);
        assert_eq!(summary, StreakSummary::default());
        assert_eq!(summary.last_activity_date, None);
    }

    #[test]
    fn test_three_consecutive_days_ending_today() {
        let clock = FixedClock::at_date(ymd(2024, 1, 3));
        let history = buckets(&[
            (ymd(2024, 1, 1), 1),
            (ymd(2024, 1, 2), 2),
            (ymd(2024, 1, 3), 1),
        ]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.current_streak, 3);
        assert_eq!(summary.longest_streak, 3);
        assert!(summary.streak_active);
        assert_eq!(summary.last_activity_date, Some(ymd(2024, 1, 3)));
    }

    #[test]
    fn test_streak_anchors_at_yesterday() {
        let clock = FixedClock::at_date(ymd(2024, 1, 4));
        let history = buckets(&[
            (ymd(2024, 1, 2), 1),
            (ymd(2024, 1, 3), 1),
        ]);

        let summary = calculate(&history, &clock);
        assert!(summary.streak_active);
        assert_eq!(summary.current_streak, 2);
    }

    #[test]
    fn test_no_completion_today_or_yesterday_kills_streak() {
        let clock = FixedClock::at_date(ymd(2024, 1, 10));
        let history = buckets(&[
            (ymd(2024, 1, 1), 1),
            (ymd(2024, 1, 2), 1),
            (ymd(2024, 1, 3), 1),
        ]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.current_streak, 0);
        assert!(!summary.streak_active);
        // Longest streak still sees the historical run.
        assert_eq!(summary.longest_streak, 3);
    }

    #[test]
    fn test_isolated_days_have_longest_one() {
        let clock = FixedClock::at_date(ymd(2024, 1, 10));
        let history = buckets(&[(ymd(2024, 1, 1), 1), (ymd(2024, 1, 5), 1)]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.longest_streak, 1);
    }

    #[test]
    fn test_longest_streak_stops_at_gap() {
        let clock = FixedClock::at_date(ymd(2024, 1, 10));
        let history = buckets(&[
            (ymd(2024, 1, 1), 1),
            (ymd(2024, 1, 2), 1),
            (ymd(2024, 1, 3), 1),
            (ymd(2024, 1, 5), 1),
            (ymd(2024, 1, 6), 1),
        ]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.longest_streak, 3);
    }

    #[test]
    fn test_days_without_completions_break_current_streak() {
        let clock = FixedClock::at_date(ymd(2024, 1, 3));
        let history = buckets(&[
            (ymd(2024, 1, 1), 1),
            (ymd(2024, 1, 2), 0), // activity but nothing completed
            (ymd(2024, 1, 3), 1),
        ]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.current_streak, 1);
        assert_eq!(summary.longest_streak, 1);
    }

    #[test]
    fn test_last_activity_date_ignores_completion_status() {
        let clock = FixedClock::at_date(ymd(2024, 1, 5));
        let history = buckets(&[
            (ymd(2024, 1, 1), 1),
            (ymd(2024, 1, 4), 0), // pending-only day is still activity
        ]);

        let summary = calculate(&history, &clock);
        assert_eq!(summary.last_activity_date, Some(ymd(2024, 1, 4)));
    }
}
