//! Rule-based insight generation.
//!
//! A fixed, ordered battery of independent rules inspects the 30-day
//! metrics plus the goal/skill/reflection collections and emits
//! human-readable observations. This is a decision table, not a scored
//! ranking: every rule runs, order is preserved, nothing is sorted or
//! deduplicated, and a rule that does not match contributes nothing.

use crate::analytics::calendar::TimeWindow;
use crate::analytics::metrics::{percentage, DAY_NAMES};
use crate::analytics::streak::StreakSummary;
use crate::types::{Goal, GoalStatus, Reflection, Skill, Task, TaskPriority, TaskStatus};
use chrono::Datelike;
use serde::Serialize;

/// Kind of observation an insight carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Improvement,
    Info,
    Motivation,
    Suggestion,
}

/// A single generated observation. Stateless and rebuilt on every
/// request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub category: &'static str,
    pub title: String,
    pub message: String,
    pub icon: &'static str,
}

/// Read-only data the rules evaluate against.
///
/// `tasks` is the 30-day window slice; `streak` and the goal/skill/
/// reflection collections cover the user's entire history.
pub struct InsightContext<'a> {
    pub window: &'a TimeWindow,
    pub tasks: &'a [Task],
    pub streak: &'a StreakSummary,
    pub goals: &'a [Goal],
    pub skills: &'a [Skill],
    pub reflections: &'a [Reflection],
}

/// A single insight rule.
///
/// Rules are stateless and independent: each sees the full context,
/// emits zero or one insight, and never observes another rule's output.
pub trait InsightRule: Send + Sync {
    /// Unique name, used for logging and engine introspection.
    fn name(&self) -> &'static str;

    /// Evaluate the rule against the context.
    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight>;
}

// ============================================
// Rules, in battery order
// ============================================

/// Rule 1: overall completion rate over the window.
struct CompletionRateRule;

impl InsightRule for CompletionRateRule {
    fn name(&self) -> &'static str {
        "completion_rate"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let completed = ctx
            .tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count() as i64;
        let rate = percentage(completed, ctx.tasks.len() as i64);

        if rate >= 80 {
            Some(Insight {
                kind: InsightKind::Positive,
                category: "productivity",
                title: "Excellent Task Completion".to_string(),
                message: format!(
                    "You're crushing it! {}% completion rate in the last 30 days. Keep up the amazing work!",
                    rate
                ),
                icon: "🎯",
            })
        } else if rate < 50 {
            Some(Insight {
                kind: InsightKind::Improvement,
                category: "productivity",
                title: "Room for Improvement".to_string(),
                message: format!(
                    "Your completion rate is {}%. Try breaking tasks into smaller chunks or setting realistic daily goals.",
                    rate
                ),
                icon: "💡",
            })
        } else {
            None
        }
    }
}

/// Rule 2: the weekday with the most completions.
///
/// Ties resolve to the first weekday in Sunday-first iteration order
/// under a strict comparison; emits only when at least one day has a
/// completion.
struct BestWeekdayRule;

impl InsightRule for BestWeekdayRule {
    fn name(&self) -> &'static str {
        "best_weekday"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let mut completions = [0i64; 7];
        for task in ctx.tasks {
            if task.status == TaskStatus::Completed {
                completions[task.created_at.weekday().num_days_from_sunday() as usize] += 1;
            }
        }

        let mut best: Option<(usize, i64)> = None;
        for (i, &count) in completions.iter().enumerate() {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((i, count));
            }
        }

        best.map(|(day, count)| Insight {
            kind: InsightKind::Info,
            category: "patterns",
            title: "Your Most Productive Day".to_string(),
            message: format!(
                "{} is your power day! You complete {} tasks on average. Schedule important work for {}s.",
                DAY_NAMES[day], count, DAY_NAMES[day]
            ),
            icon: "📊",
        })
    }
}

/// Rule 3: current streak status.
struct StreakRule;

impl InsightRule for StreakRule {
    fn name(&self) -> &'static str {
        "streak"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        if ctx.streak.current_streak >= 7 {
            Some(Insight {
                kind: InsightKind::Positive,
                category: "consistency",
                title: "Amazing Streak!".to_string(),
                message: format!(
                    "{} days streak! You're building powerful habits. Don't break the chain!",
                    ctx.streak.current_streak
                ),
                icon: "🔥",
            })
        } else if ctx.streak.current_streak == 0 {
            Some(Insight {
                kind: InsightKind::Motivation,
                category: "consistency",
                title: "Start Fresh".to_string(),
                message: "No active streak. Complete just one task today to start building momentum!"
                    .to_string(),
                icon: "🚀",
            })
        } else {
            None
        }
    }
}

/// Rule 4: active goals close to completion.
struct NearCompleteGoalsRule;

impl InsightRule for NearCompleteGoalsRule {
    fn name(&self) -> &'static str {
        "near_complete_goals"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let close = ctx
            .goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active && g.progress() >= 80)
            .count();

        if close == 0 {
            return None;
        }

        Some(Insight {
            kind: InsightKind::Motivation,
            category: "goals",
            title: "Almost There!".to_string(),
            message: format!(
                "You're 80%+ done with {} goal(s). A final push will get you across the finish line!",
                close
            ),
            icon: "🎉",
        })
    }
}

/// Rule 5: skill practice consistency.
struct PracticeConsistencyRule;

impl InsightRule for PracticeConsistencyRule {
    fn name(&self) -> &'static str {
        "practice_consistency"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let with_logs: Vec<&Skill> = ctx
            .skills
            .iter()
            .filter(|s| !s.practice_logs.is_empty())
            .collect();

        if with_logs.is_empty() {
            return Some(Insight {
                kind: InsightKind::Suggestion,
                category: "learning",
                title: "Start Learning".to_string(),
                message: "Add a skill you want to learn and start tracking your practice. Small daily steps lead to mastery!"
                    .to_string(),
                icon: "🎓",
            });
        }

        let total_hours: f64 = with_logs.iter().map(|s| s.total_hours).sum();
        if total_hours >= 20.0 {
            Some(Insight {
                kind: InsightKind::Positive,
                category: "learning",
                title: "Dedicated Learner".to_string(),
                message: format!(
                    "{} hours of practice logged! You're investing in your growth consistently.",
                    total_hours.round() as i64
                ),
                icon: "📚",
            })
        } else {
            None
        }
    }
}

/// Rule 6: weekly reflection habit.
struct ReflectionHabitRule;

impl InsightRule for ReflectionHabitRule {
    fn name(&self) -> &'static str {
        "reflection_habit"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let count = ctx.reflections.len();
        if count >= 4 {
            Some(Insight {
                kind: InsightKind::Positive,
                category: "reflection",
                title: "Self-Aware Growth".to_string(),
                message: format!(
                    "You've completed {} weekly reflections. This self-awareness accelerates your growth!",
                    count
                ),
                icon: "🧠",
            })
        } else if count == 0 {
            Some(Insight {
                kind: InsightKind::Suggestion,
                category: "reflection",
                title: "Try Weekly Reflections".to_string(),
                message: "Weekly reflections help you learn from wins and challenges. Start this Sunday!"
                    .to_string(),
                icon: "✍️",
            })
        } else {
            None
        }
    }
}

/// Rule 7: completion rate among high-priority tasks only.
struct HighPriorityFocusRule;

impl InsightRule for HighPriorityFocusRule {
    fn name(&self) -> &'static str {
        "high_priority_focus"
    }

    fn evaluate(&self, ctx: &InsightContext) -> Option<Insight> {
        let high: Vec<&Task> = ctx
            .tasks
            .iter()
            .filter(|t| t.priority == TaskPriority::High)
            .collect();

        if high.is_empty() {
            return None;
        }

        let completed = high
            .iter()
            .filter(|t| t.status == TaskStatus::Completed)
            .count() as i64;
        let rate = percentage(completed, high.len() as i64);

        if rate >= 80 {
            Some(Insight {
                kind: InsightKind::Positive,
                category: "priorities",
                title: "Focused Execution".to_string(),
                message: format!(
                    "{}% of high-priority tasks completed. You're excellent at focusing on what matters most!",
                    rate
                ),
                icon: "🎯",
            })
        } else if rate < 50 {
            Some(Insight {
                kind: InsightKind::Improvement,
                category: "priorities",
                title: "Focus on High-Priority".to_string(),
                message: format!(
                    "Only {}% of high-priority tasks done. Try tackling your most important task first each day.",
                    rate
                ),
                icon: "⚡",
            })
        } else {
            None
        }
    }
}

// ============================================
// Engine
// ============================================

/// Engine that runs a fixed, ordered battery of insight rules.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl InsightEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Engine with the standard seven-rule battery, in order.
    pub fn with_default_rules() -> Self {
        let mut engine = Self::new();
        engine.register(Box::new(CompletionRateRule));
        engine.register(Box::new(BestWeekdayRule));
        engine.register(Box::new(StreakRule));
        engine.register(Box::new(NearCompleteGoalsRule));
        engine.register(Box::new(PracticeConsistencyRule));
        engine.register(Box::new(ReflectionHabitRule));
        engine.register(Box::new(HighPriorityFocusRule));
        engine
    }

    /// Append a rule to the battery.
    pub fn register(&mut self, rule: Box<dyn InsightRule>) {
        tracing::debug!(rule = rule.name(), "Registered insight rule");
        self.rules.push(rule);
    }

    /// Names of registered rules, in battery order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run every rule unconditionally, preserving battery order.
    pub fn run(&self, ctx: &InsightContext) -> Vec<Insight> {
        let insights: Vec<Insight> = self.rules.iter().filter_map(|r| r.evaluate(ctx)).collect();
        tracing::debug!(
            rules = self.rules.len(),
            insights = insights.len(),
            "Insight battery evaluated"
        );
        insights
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
