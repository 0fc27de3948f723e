//! Analytics engine for momentum
//!
//! Derives presentation-ready statistics from a user's activity records:
//! - Calendar windows and day-bucketing
//! - Completion streaks
//! - Consistency score and weekly/monthly rollups
//! - Activity heatmap
//! - Rule-based insights
//!
//! Everything here is a pure function over already-fetched records: the
//! storage layer hands over one owner's records, the caller picks a
//! window, and each function returns a plain serializable value. No
//! function performs I/O or reads the wall clock directly; "now" comes
//! in through the [`Clock`](crate::clock::Clock) seam.
//!
//! ## Insight rules
//!
//! Insights use the same registry shape as the rest of the engine's
//! consumers expect from a plugin battery: a fixed, ordered list of
//! independent [`InsightRule`]s, each emitting at most one observation
//! per run. See [`insight`] for the battery.

pub mod calendar;
pub mod dashboard;
pub mod heatmap;
pub mod insight;
pub mod metrics;
pub mod streak;

pub use calendar::{date_range, days_between, group_by_day, DayBucket, TimeWindow};
pub use dashboard::{overview, DashboardOverview};
pub use heatmap::{build as build_heatmap, ActivityHeatmap, HeatmapCell, HeatmapSummary};
pub use insight::{Insight, InsightContext, InsightEngine, InsightKind, InsightRule};
pub use metrics::{
    consistency_score, monthly_rollup, percentage, productivity_patterns, weekly_rollup,
    ConsistencyReport, MonthlyStats, ProductivityPatterns, WeeklyStats, DAY_NAMES,
};
pub use streak::{calculate as calculate_streak, StreakSummary};
