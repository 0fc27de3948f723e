//! Dashboard overview.
//!
//! Built from a single fetch of the user's full task history: the same
//! record set feeds both today's counters and the streak calculation.

use crate::analytics::calendar::group_by_day;
use crate::analytics::metrics::percentage;
use crate::analytics::streak::{self, StreakSummary};
use crate::clock::Clock;
use crate::types::{Goal, GoalStatus, Skill, Task, TaskStatus};
use chrono::NaiveDate;
use serde::Serialize;

/// Today's task counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayTaskStats {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub completion_rate: i64,
}

/// The "today" section of the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySection {
    pub date: NaiveDate,
    pub tasks: TodayTaskStats,
}

/// Counts of currently active goals and skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCounts {
    pub goals: i64,
    pub skills: i64,
}

/// Everything the dashboard needs in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub today: TodaySection,
    pub active: ActiveCounts,
    pub streak: StreakSummary,
}

/// Build the dashboard overview from one task fetch plus the goal and
/// skill collections.
pub fn overview(
    clock: &dyn Clock,
    tasks: &[Task],
    goals: &[Goal],
    skills: &[Skill],
) -> DashboardOverview {
    let today = clock.today();

    let mut total = 0;
    let mut completed = 0;
    let mut pending = 0;
    for task in tasks.iter().filter(|t| t.created_at.date_naive() == today) {
        total += 1;
        match task.status {
            TaskStatus::Completed => completed += 1,
            TaskStatus::Pending => pending += 1,
            TaskStatus::InProgress => {}
        }
    }

    let buckets = group_by_day(tasks);
    let streak = streak::calculate(&buckets, clock);

    DashboardOverview {
        today: TodaySection {
            date: today,
            tasks: TodayTaskStats {
                total,
                completed,
                pending,
                completion_rate: percentage(completed, total),
            },
        },
        active: ActiveCounts {
            goals: goals.iter().filter(|g| g.status == GoalStatus::Active).count() as i64,
            skills: skills.iter().filter(|s| s.is_active).count() as i64,
        },
        streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::{GoalPeriod, SkillCategory, SkillLevel, TaskPriority};
    use chrono::Utc;

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
            created_at: date.and_hms_opt(7, 0, 0).unwrap().and_utc(),
            updated_at: date.and_hms_opt(7, 0, 0).unwrap().and_utc(),
        }
    }

    #[test]
    fn test_overview_counts_today_and_streak_from_one_fetch() {
        let clock = FixedClock::at_date(ymd(2024, 1, 3));

        let tasks = vec![
            task_on(ymd(2024, 1, 1), TaskStatus::Completed),
            task_on(ymd(2024, 1, 2), TaskStatus::Completed),
            task_on(ymd(2024, 1, 3), TaskStatus::Completed),
            task_on(ymd(2024, 1, 3), TaskStatus::Pending),
            task_on(ymd(2024, 1, 3), TaskStatus::InProgress),
        ];

        let goals = vec![
            Goal {
                id: "g1".to_string(),
                owner_id: "u1".to_string(),
                title: "goal".to_string(),
                description: None,
                status: GoalStatus::Active,
                target: 5,
                current: 0,
                period: GoalPeriod::Weekly,
                start_date: Utc::now(),
                end_date: Utc::now(),
                created_at: Utc::now(),
            },
            Goal {
                id: "g2".to_string(),
                owner_id: "u1".to_string(),
                title: "done".to_string(),
                description: None,
                status: GoalStatus::Completed,
                target: 5,
                current: 5,
                period: GoalPeriod::Weekly,
                start_date: Utc::now(),
                end_date: Utc::now(),
                created_at: Utc::now(),
            },
        ];

        let skills = vec![Skill {
            id: "s1".to_string(),
            owner_id: "u1".to_string(),
            name: "Running".to_string(),
            description: None,
            category: SkillCategory::Sport,
            level: SkillLevel::Intermediate,
            target_hours: 40.0,
            total_hours: 3.0,
            practice_logs: vec![],
            is_active: true,
            created_at: Utc::now(),
        }];

        let overview = overview(&clock, &tasks, &goals, &skills);

        assert_eq!(overview.today.date, ymd(2024, 1, 3));
        assert_eq!(overview.today.tasks.total, 3);
        assert_eq!(overview.today.tasks.completed, 1);
        assert_eq!(overview.today.tasks.pending, 1);
        assert_eq!(overview.today.tasks.completion_rate, 33);

        assert_eq!(overview.active.goals, 1);
        assert_eq!(overview.active.skills, 1);

        assert_eq!(overview.streak.current_streak, 3);
        assert!(overview.streak.streak_active);
    }

    #[test]
    fn test_overview_with_no_history() {
        let clock = FixedClock::at_date(ymd(2024, 1, 3));
        let overview = overview(&clock, &[], &[], &[]);

        assert_eq!(overview.today.tasks.total, 0);
        assert_eq!(overview.today.tasks.completion_rate, 0);
        assert_eq!(overview.streak, StreakSummary::default());
    }
}
