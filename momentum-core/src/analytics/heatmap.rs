//! Activity heatmap for the calendar view.
//!
//! Maps every date of a window (default: last 365 days) to an intensity
//! bucket derived from that day's completion count.

use crate::analytics::calendar::{DayBucket, TimeWindow};
use crate::analytics::metrics::percentage;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// One cell of the heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapCell {
    pub date: NaiveDate,
    /// Total tasks created that day
    pub count: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
    /// 0 = no completions, 4 = ten or more
    pub intensity: u8,
}

/// The day with the most completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDay {
    pub date: NaiveDate,
    pub completed: i64,
}

/// Aggregate stats across the heatmap window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSummary {
    pub total_days: i64,
    /// Days with any task created
    pub active_days: i64,
    pub total_completed: i64,
    pub activity_rate: i64,
    pub best_day: BestDay,
}

/// Heatmap cells plus summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityHeatmap {
    pub heatmap: Vec<HeatmapCell>,
    pub summary: HeatmapSummary,
}

/// Intensity bucket for a day's completion count: 0, 1-3, 4-6, 7-9, 10+.
fn intensity_for(completed: i64) -> u8 {
    match completed {
        c if c >= 10 => 4,
        c if c >= 7 => 3,
        c if c >= 4 => 2,
        c if c >= 1 => 1,
        _ => 0,
    }
}

/// Build the heatmap for a window from grouped daily buckets.
///
/// Every date in the window gets a cell, empty days included. The best
/// day is the first date with the maximum completion count; the scan is
/// in ascending date order under a strict comparison, so earlier dates
/// win ties.
pub fn build(window: &TimeWindow, buckets: &BTreeMap<NaiveDate, DayBucket>) -> ActivityHeatmap {
    let mut cells = Vec::new();
    let mut active_days = 0;
    let mut total_completed = 0;
    let mut best: Option<BestDay> = None;

    for date in window.dates() {
        let bucket = buckets.get(&date).copied().unwrap_or_default();

        if bucket.total > 0 {
            active_days += 1;
        }
        total_completed += bucket.completed;

        let improves = best.map_or(true, |b| bucket.completed > b.completed);
        if improves {
            best = Some(BestDay {
                date,
                completed: bucket.completed,
            });
        }

        cells.push(HeatmapCell {
            date,
            count: bucket.total,
            completed: bucket.completed,
            pending: bucket.pending,
            in_progress: bucket.in_progress,
            intensity: intensity_for(bucket.completed),
        });
    }

    let total_days = cells.len() as i64;
    // Window construction guarantees at least one day.
    let best_day = best.unwrap_or(BestDay {
        date: window.start_date(),
        completed: 0,
    });

    ActivityHeatmap {
        heatmap: cells,
        summary: HeatmapSummary {
            total_days,
            active_days,
            total_completed,
            activity_rate: percentage(active_days, total_days),
            best_day,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::calendar::group_by_day;
    use crate::clock::FixedClock;
    use crate::types::{Task, TaskPriority, TaskStatus};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tasks_on(date: NaiveDate, completed: usize, pending: usize) -> Vec<Task> {
        let make = |status| Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "u1".to_string(),
            title: "task".to_string(),
            description: None,
            status,
            priority: TaskPriority::Medium,
            due_date: None,
            created_at: date.and_hms_opt(8, 0, 0).unwrap().and_utc(),
            updated_at: date.and_hms_opt(8, 0, 0).unwrap().and_utc(),
        };
        let mut tasks: Vec<Task> = (0..completed).map(|_| make(TaskStatus::Completed)).collect();
        tasks.extend((0..pending).map(|_| make(TaskStatus::Pending)));
        tasks
    }

    #[test]
    fn test_intensity_thresholds() {
        assert_eq!(intensity_for(0), 0);
        assert_eq!(intensity_for(1), 1);
        assert_eq!(intensity_for(3), 1);
        assert_eq!(intensity_for(4), 2);
        assert_eq!(intensity_for(6), 2);
        assert_eq!(intensity_for(7), 3);
        assert_eq!(intensity_for(9), 3);
        assert_eq!(intensity_for(10), 4);
        assert_eq!(intensity_for(25), 4);
    }

    #[test]
    fn test_every_window_date_gets_a_cell() {
        let clock = FixedClock::at_date(ymd(2024, 1, 7));
        let window = TimeWindow::last_n_days(&clock, 7).unwrap();

        let mut tasks = tasks_on(ymd(2024, 1, 3), 2, 1);
        tasks.extend(tasks_on(ymd(2024, 1, 5), 0, 1));
        let buckets = group_by_day(&tasks);

        let heatmap = build(&window, &buckets);
        assert_eq!(heatmap.heatmap.len(), 7);
        assert_eq!(heatmap.summary.total_days, 7);
        assert_eq!(heatmap.summary.active_days, 2);
        assert_eq!(heatmap.summary.total_completed, 2);
        assert_eq!(heatmap.summary.activity_rate, 29); // 2/7

        let cell = heatmap.heatmap.iter().find(|c| c.date == ymd(2024, 1, 3)).unwrap();
        assert_eq!(cell.count, 3);
        assert_eq!(cell.completed, 2);
        assert_eq!(cell.pending, 1);
        assert_eq!(cell.intensity, 1);

        // A day with activity but no completions stays at intensity 0.
        let idle = heatmap.heatmap.iter().find(|c| c.date == ymd(2024, 1, 5)).unwrap();
        assert_eq!(idle.count, 1);
        assert_eq!(idle.intensity, 0);
    }

    #[test]
    fn test_best_day_first_wins_ties() {
        let clock = FixedClock::at_date(ymd(2024, 1, 10));
        let window = TimeWindow::last_n_days(&clock, 10).unwrap();

        let mut tasks = tasks_on(ymd(2024, 1, 4), 3, 0);
        tasks.extend(tasks_on(ymd(2024, 1, 8), 3, 0));
        let buckets = group_by_day(&tasks);

        let heatmap = build(&window, &buckets);
        assert_eq!(heatmap.summary.best_day.date, ymd(2024, 1, 4));
        assert_eq!(heatmap.summary.best_day.completed, 3);
    }

    #[test]
    fn test_empty_window_has_zero_best_day() {
        let clock = FixedClock::at_date(ymd(2024, 1, 10));
        let window = TimeWindow::last_n_days(&clock, 5).unwrap();

        let heatmap = build(&window, &BTreeMap::new());
        assert_eq!(heatmap.summary.active_days, 0);
        assert_eq!(heatmap.summary.total_completed, 0);
        assert_eq!(heatmap.summary.activity_rate, 0);
        // First date of the window, zero completions: same first-wins rule.
        assert_eq!(heatmap.summary.best_day.date, ymd(2024, 1, 6));
        assert_eq!(heatmap.summary.best_day.completed, 0);
    }
}
