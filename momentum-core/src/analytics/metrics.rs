//! Aggregate metrics: consistency score, weekly/monthly rollups, and
//! productivity patterns.
//!
//! Day-of-week breakdowns use the Sunday-first `DAY_NAMES` convention
//! for display while week windows stay Monday-first; both conventions
//! are part of the existing API and are kept as-is.

use crate::analytics::calendar::{group_by_day, TimeWindow};
use crate::types::{Goal, GoalStatus, Reflection, Skill, Task, TaskPriority, TaskStatus};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Day names in Sunday-first order, indexed by
/// `Datelike::weekday().num_days_from_sunday()`.
pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Integer percentage of `part` in `total`, rounded half away from zero
/// (the behavior of JS `Math.round` for the non-negative values this
/// engine produces). A zero total is a defined zero, not an error.
pub fn percentage(part: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as i64
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

fn in_window<'a>(window: &'a TimeWindow, tasks: &'a [Task]) -> impl Iterator<Item = &'a Task> {
    tasks.iter().filter(move |t| window.contains(t.created_at))
}

fn goal_overlaps(window: &TimeWindow, goal: &Goal) -> bool {
    goal.start_date <= window.end && goal.end_date >= window.start
}

// ============================================
// Consistency score
// ============================================

/// Input metrics behind a consistency score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyMetrics {
    pub days_with_activity: i64,
    pub days_with_completed_tasks: i64,
    pub total_days: i64,
    pub activity_rate: i64,
    pub completion_rate: i64,
    pub task_completion_rate: i64,
}

/// Consistency score (0-100) with its component metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub consistency_score: i64,
    /// Human-readable window length, e.g. "30 days"
    pub period: String,
    pub metrics: ConsistencyMetrics,
}

/// Score how consistently the user showed up over the window.
///
/// Weighted blend: 30% days-with-activity rate, 40% days-with-completion
/// rate, 30% task completion rate. Records outside the window are
/// ignored.
pub fn consistency_score(window: &TimeWindow, tasks: &[Task]) -> ConsistencyReport {
    let windowed: Vec<&Task> = in_window(window, tasks).collect();
    let buckets = group_by_day(windowed.iter().copied());
    let dates = window.dates();

    let mut days_with_activity = 0;
    let mut days_with_completed_tasks = 0;
    let mut total_completed = 0;

    for date in &dates {
        if let Some(bucket) = buckets.get(date) {
            if bucket.total > 0 {
                days_with_activity += 1;
            }
            if bucket.completed > 0 {
                days_with_completed_tasks += 1;
            }
            total_completed += bucket.completed;
        }
    }

    let total_days = dates.len() as i64;
    let activity_rate = percentage(days_with_activity, total_days);
    let completion_rate = percentage(days_with_completed_tasks, total_days);
    let task_completion_rate = percentage(total_completed, windowed.len() as i64);

    let consistency_score =
        (activity_rate as f64 * 0.3 + completion_rate as f64 * 0.4 + task_completion_rate as f64 * 0.3)
            .round() as i64;

    ConsistencyReport {
        consistency_score,
        period: format!("{} days", total_days),
        metrics: ConsistencyMetrics {
            days_with_activity,
            days_with_completed_tasks,
            total_days,
            activity_rate,
            completion_rate,
            task_completion_rate,
        },
    }
}

// ============================================
// Weekly rollup
// ============================================

/// Calendar bounds of a rollup, as plain dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Task counts keyed by display day name, Monday-first in the output
/// object as the existing consumers render it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TasksByDay {
    #[serde(rename = "Monday")]
    pub monday: i64,
    #[serde(rename = "Tuesday")]
    pub tuesday: i64,
    #[serde(rename = "Wednesday")]
    pub wednesday: i64,
    #[serde(rename = "Thursday")]
    pub thursday: i64,
    #[serde(rename = "Friday")]
    pub friday: i64,
    #[serde(rename = "Saturday")]
    pub saturday: i64,
    #[serde(rename = "Sunday")]
    pub sunday: i64,
}

impl TasksByDay {
    /// Build from Sunday-first counts (index 0 = Sunday).
    fn from_sunday_first(counts: [i64; 7]) -> Self {
        TasksByDay {
            sunday: counts[0],
            monday: counts[1],
            tuesday: counts[2],
            wednesday: counts[3],
            thursday: counts[4],
            friday: counts[5],
            saturday: counts[6],
        }
    }
}

/// Task counts for one week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completion_rate: i64,
    pub by_day: TasksByDay,
}

/// Goal counts for one week.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoalStats {
    pub active: i64,
    pub completed: i64,
    pub total: i64,
}

/// Weekly statistics rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_period: Period,
    pub tasks: WeeklyTaskStats,
    pub goals: WeeklyGoalStats,
}

/// Roll up one week of tasks and the goals overlapping it.
pub fn weekly_rollup(window: &TimeWindow, tasks: &[Task], goals: &[Goal]) -> WeeklyStats {
    let mut total = 0;
    let mut completed = 0;
    let mut pending = 0;
    let mut in_progress = 0;
    let mut by_day = [0i64; 7];

    for task in in_window(window, tasks) {
        total += 1;
        match task.status {
            TaskStatus::Completed => completed += 1,
            TaskStatus::Pending => pending += 1,
            TaskStatus::InProgress => in_progress += 1,
        }
        by_day[task.created_at.weekday().num_days_from_sunday() as usize] += 1;
    }

    let overlapping: Vec<&Goal> = goals.iter().filter(|g| goal_overlaps(window, g)).collect();
    let active_goals = overlapping
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .count() as i64;
    let completed_goals = overlapping
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count() as i64;

    WeeklyStats {
        week_period: Period {
            start: window.start_date(),
            end: window.end_date(),
        },
        tasks: WeeklyTaskStats {
            total,
            completed,
            pending,
            in_progress,
            completion_rate: percentage(completed, total),
            by_day: TasksByDay::from_sunday_first(by_day),
        },
        goals: WeeklyGoalStats {
            active: active_goals,
            completed: completed_goals,
            total: overlapping.len() as i64,
        },
    }
}

// ============================================
// Monthly rollup
// ============================================

/// Calendar bounds of a month plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub month: String,
    pub year: i32,
}

/// Task counts by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityBreakdown {
    pub high: i64,
    pub medium: i64,
    pub low: i64,
}

/// Task counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTaskStats {
    pub total: i64,
    pub completed: i64,
    pub completion_rate: i64,
    pub by_priority: PriorityBreakdown,
}

/// Goal counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoalStats {
    pub total: i64,
    pub completed: i64,
    pub completion_rate: i64,
}

/// Skill practice totals. Hours are rounded to one decimal for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySkillStats {
    pub total_hours: f64,
    pub total_sessions: i64,
    pub active_skills: i64,
}

/// Reflection counts for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReflectionStats {
    pub total: i64,
    pub completed: i64,
}

/// One 7-day chunk of the month. Chunks start at the month's first day;
/// the final chunk may be shorter than 7 days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekChunk {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub completion_rate: i64,
}

/// Monthly statistics rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyStats {
    pub month_period: MonthPeriod,
    pub tasks: MonthlyTaskStats,
    pub goals: MonthlyGoalStats,
    pub skills: MonthlySkillStats,
    pub reflections: MonthlyReflectionStats,
    pub weekly_progress: Vec<WeekChunk>,
}

/// Roll up one month of activity across all four record kinds.
pub fn monthly_rollup(
    window: &TimeWindow,
    tasks: &[Task],
    goals: &[Goal],
    skills: &[Skill],
    reflections: &[Reflection],
) -> MonthlyStats {
    let windowed: Vec<&Task> = in_window(window, tasks).collect();

    let total = windowed.len() as i64;
    let completed = windowed
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count() as i64;

    let mut by_priority = PriorityBreakdown::default();
    for task in &windowed {
        match task.priority {
            TaskPriority::High => by_priority.high += 1,
            TaskPriority::Medium => by_priority.medium += 1,
            TaskPriority::Low => by_priority.low += 1,
        }
    }

    let overlapping: Vec<&Goal> = goals.iter().filter(|g| goal_overlaps(window, g)).collect();
    let completed_goals = overlapping
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count() as i64;

    let total_hours: f64 = skills.iter().map(|s| s.total_hours).sum();
    let total_sessions: i64 = skills.iter().map(|s| s.total_sessions() as i64).sum();
    let active_skills = skills.iter().filter(|s| s.is_active).count() as i64;

    let start_date = window.start_date();
    let end_date = window.end_date();
    let in_month = |d: NaiveDate| d >= start_date && d <= end_date;
    let monthly_reflections: Vec<&Reflection> = reflections
        .iter()
        .filter(|r| in_month(r.week_start_date))
        .collect();
    let completed_reflections = monthly_reflections
        .iter()
        .filter(|r| r.is_complete)
        .count() as i64;

    MonthlyStats {
        month_period: MonthPeriod {
            start: start_date,
            end: end_date,
            month: month_name(start_date.month()).to_string(),
            year: start_date.year(),
        },
        tasks: MonthlyTaskStats {
            total,
            completed,
            completion_rate: percentage(completed, total),
            by_priority,
        },
        goals: MonthlyGoalStats {
            total: overlapping.len() as i64,
            completed: completed_goals,
            completion_rate: percentage(completed_goals, overlapping.len() as i64),
        },
        skills: MonthlySkillStats {
            total_hours: round_tenth(total_hours),
            total_sessions,
            active_skills,
        },
        reflections: MonthlyReflectionStats {
            total: monthly_reflections.len() as i64,
            completed: completed_reflections,
        },
        weekly_progress: week_chunks(window, &windowed),
    }
}

/// Partition the window into 7-day chunks starting at its first day and
/// total tasks/completions per chunk.
fn week_chunks(window: &TimeWindow, tasks: &[&Task]) -> Vec<WeekChunk> {
    let buckets = group_by_day(tasks.iter().copied());

    let mut chunks = Vec::new();
    let end = window.end_date();
    let mut chunk_start = window.start_date();

    while chunk_start <= end {
        let chunk_end = (chunk_start + chrono::Days::new(6)).min(end);

        let mut chunk_total = 0;
        let mut chunk_completed = 0;
        let mut day = chunk_start;
        while day <= chunk_end {
            if let Some(bucket) = buckets.get(&day) {
                chunk_total += bucket.total;
                chunk_completed += bucket.completed;
            }
            day = day + chrono::Days::new(1);
        }

        chunks.push(WeekChunk {
            week_start: chunk_start,
            week_end: chunk_end,
            total_tasks: chunk_total,
            completed_tasks: chunk_completed,
            completion_rate: percentage(chunk_completed, chunk_total),
        });

        chunk_start = chunk_start + chrono::Days::new(7);
    }

    chunks
}

// ============================================
// Productivity patterns
// ============================================

/// Completion stats for one day of the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayAnalysis {
    pub total: i64,
    pub completed: i64,
    pub completion_rate: i64,
}

/// A named day with its completion rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatedDay {
    pub name: String,
    pub rate: i64,
}

/// A scheduling recommendation derived from the patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// "optimize" or "improve"
    pub kind: &'static str,
    pub message: String,
}

/// Per-priority completion stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorityAnalysis {
    pub total: i64,
    pub completed: i64,
    pub completion_rate: i64,
}

/// Per-weekday completion analysis keyed by display day name,
/// Sunday-first as the existing consumers render it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WeekdayBreakdown {
    #[serde(rename = "Sunday")]
    pub sunday: DayAnalysis,
    #[serde(rename = "Monday")]
    pub monday: DayAnalysis,
    #[serde(rename = "Tuesday")]
    pub tuesday: DayAnalysis,
    #[serde(rename = "Wednesday")]
    pub wednesday: DayAnalysis,
    #[serde(rename = "Thursday")]
    pub thursday: DayAnalysis,
    #[serde(rename = "Friday")]
    pub friday: DayAnalysis,
    #[serde(rename = "Saturday")]
    pub saturday: DayAnalysis,
}

impl WeekdayBreakdown {
    fn from_sunday_first(days: [DayAnalysis; 7]) -> Self {
        WeekdayBreakdown {
            sunday: days[0],
            monday: days[1],
            tuesday: days[2],
            wednesday: days[3],
            thursday: days[4],
            friday: days[5],
            saturday: days[6],
        }
    }
}

/// Day-of-week and priority patterns over a window, with
/// recommendations. `None` when the window has no tasks at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductivityPatterns {
    pub day_of_week: WeekdayBreakdown,
    pub best_day: Option<RatedDay>,
    pub worst_day: Option<RatedDay>,
    pub high: PriorityAnalysis,
    pub medium: PriorityAnalysis,
    pub low: PriorityAnalysis,
    pub tasks_per_week: i64,
    pub completed_per_week: i64,
    pub recommendations: Vec<Recommendation>,
}

/// Analyze completion patterns by weekday and priority.
///
/// Best/worst day consider only weekdays with at least one task; ties
/// resolve to the first hit in Sunday-first iteration order under
/// strict comparison.
pub fn productivity_patterns(window: &TimeWindow, tasks: &[Task]) -> Option<ProductivityPatterns> {
    let windowed: Vec<&Task> = in_window(window, tasks).collect();
    if windowed.is_empty() {
        return None;
    }

    let mut days = [DayAnalysis::default(); 7];
    let mut priorities = [PriorityAnalysis::default(); 3];

    for task in &windowed {
        let day = &mut days[task.created_at.weekday().num_days_from_sunday() as usize];
        day.total += 1;

        let priority = &mut priorities[match task.priority {
            TaskPriority::High => 0,
            TaskPriority::Medium => 1,
            TaskPriority::Low => 2,
        }];
        priority.total += 1;

        if task.status == TaskStatus::Completed {
            day.completed += 1;
            priority.completed += 1;
        }
    }

    for day in &mut days {
        day.completion_rate = percentage(day.completed, day.total);
    }
    for priority in &mut priorities {
        priority.completion_rate = percentage(priority.completed, priority.total);
    }

    // Strict comparisons against 0/100 sentinels: a window where every
    // weekday sits at 0% has no best day, and one where every weekday
    // sits at 100% has no worst day. Ties keep the first weekday hit in
    // Sunday-first order.
    let mut best_day: Option<RatedDay> = None;
    let mut worst_day: Option<RatedDay> = None;
    for (i, day) in days.iter().enumerate() {
        if day.total == 0 {
            continue;
        }
        if day.completion_rate > best_day.as_ref().map_or(0, |b| b.rate) {
            best_day = Some(RatedDay {
                name: DAY_NAMES[i].to_string(),
                rate: day.completion_rate,
            });
        }
        if day.completion_rate < worst_day.as_ref().map_or(100, |w| w.rate) {
            worst_day = Some(RatedDay {
                name: DAY_NAMES[i].to_string(),
                rate: day.completion_rate,
            });
        }
    }

    let mut recommendations = Vec::new();
    if let Some(best) = best_day.as_ref().filter(|b| b.rate >= 80) {
        recommendations.push(Recommendation {
            kind: "optimize",
            message: format!(
                "Schedule important tasks on {}s ({}% completion rate)",
                best.name, best.rate
            ),
        });
    }
    if let Some(worst) = worst_day.as_ref().filter(|w| w.rate < 50) {
        recommendations.push(Recommendation {
            kind: "improve",
            message: format!(
                "{}s need attention ({}% completion rate). Try lighter workload or better planning.",
                worst.name, worst.rate
            ),
        });
    }

    let completed_total = windowed
        .iter()
        .filter(|t| t.status == TaskStatus::Completed)
        .count();

    // A 30-day window is roughly 4.3 weeks.
    let tasks_per_week = (windowed.len() as f64 / 4.3).round() as i64;
    let completed_per_week = (completed_total as f64 / 4.3).round() as i64;

    Some(ProductivityPatterns {
        day_of_week: WeekdayBreakdown::from_sunday_first(days),
        best_day,
        worst_day,
        high: priorities[0],
        medium: priorities[1],
        low: priorities[2],
        tasks_per_week,
        completed_per_week,
        recommendations,
    })
}
