//! Core domain types for momentum
//!
//! These types represent the persisted data model that the analytics
//! engine consumes read-only: tasks, goals, skills, and weekly
//! reflections, all owned by exactly one user.
//!
//! Serialized field names match the JSON API the existing consumers
//! expect (`camelCase`, status strings like `in-progress`), so the enums
//! carry explicit `as_str`/`FromStr` pairs used by both serde and the
//! storage layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================
// Task
// ============================================

/// Status of a task. Unknown status strings are rejected at the storage
/// boundary; the analytics engine never sees a status outside these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    /// Returns the identifier used in database storage and JSON output
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            _ => Err(format!("unknown task status: {}", s)),
        }
    }
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            _ => Err(format!("unknown task priority: {}", s)),
        }
    }
}

/// A single task. The analytics engine reads `created_at`, `status`, and
/// `priority`; everything else is carried for the CRUD surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier
    pub id: String,
    /// Owning user; every query is scoped to exactly one owner
    pub owner_id: String,
    /// Short task title
    pub title: String,
    /// Optional longer description
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    /// Optional due date
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp; the calendar day of this instant is the
    /// bucketing key for all analytics
    pub created_at: DateTime<Utc>,
    /// Bumped on every mutation
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a pending task with a fresh id.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        priority: TaskPriority,
        created_at: DateTime<Utc>,
    ) -> Self {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            priority,
            due_date: None,
            created_at,
            updated_at: created_at,
        }
    }
}

// ============================================
// Goal
// ============================================

/// Lifecycle status of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Failed,
    Paused,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Completed => "completed",
            GoalStatus::Failed => "failed",
            GoalStatus::Paused => "paused",
        }
    }
}

impl std::str::FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "completed" => Ok(GoalStatus::Completed),
            "failed" => Ok(GoalStatus::Failed),
            "paused" => Ok(GoalStatus::Paused),
            _ => Err(format!("unknown goal status: {}", s)),
        }
    }
}

/// Cadence a goal is tracked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Daily,
    Weekly,
    Monthly,
}

impl GoalPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPeriod::Daily => "daily",
            GoalPeriod::Weekly => "weekly",
            GoalPeriod::Monthly => "monthly",
        }
    }
}

impl std::str::FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(GoalPeriod::Daily),
            "weekly" => Ok(GoalPeriod::Weekly),
            "monthly" => Ok(GoalPeriod::Monthly),
            _ => Err(format!("unknown goal period: {}", s)),
        }
    }
}

/// A measurable goal with a numeric target and running counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: GoalStatus,
    /// Target count; at least 1
    pub target: i64,
    /// Current count toward the target
    pub current: i64,
    pub period: GoalPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// Create an active goal with a fresh id and zero progress.
    pub fn new(
        owner_id: impl Into<String>,
        title: impl Into<String>,
        target: i64,
        period: GoalPeriod,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Goal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title: title.into(),
            description: None,
            status: GoalStatus::Active,
            target,
            current: 0,
            period,
            start_date,
            end_date,
            created_at: start_date,
        }
    }

    /// Progress toward the target as a 0..=100 percentage.
    /// A zero target is a defined zero, not an error.
    pub fn progress(&self) -> i64 {
        if self.target == 0 {
            return 0;
        }
        ((self.current as f64 / self.target as f64) * 100.0).round() as i64
    }

    /// Flip to `Completed` once the counter reaches the target.
    pub fn check_completion(&mut self) -> bool {
        if self.current >= self.target {
            self.status = GoalStatus::Completed;
        }
        self.status == GoalStatus::Completed
    }

    /// Bump the counter and re-run the completion check.
    pub fn update_progress(&mut self, increment: i64) {
        self.current += increment;
        self.check_completion();
    }
}

// ============================================
// Skill
// ============================================

/// Category a skill belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Programming,
    Language,
    Music,
    Art,
    Sport,
    Business,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Programming => "programming",
            SkillCategory::Language => "language",
            SkillCategory::Music => "music",
            SkillCategory::Art => "art",
            SkillCategory::Sport => "sport",
            SkillCategory::Business => "business",
            SkillCategory::Other => "other",
        }
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "programming" => Ok(SkillCategory::Programming),
            "language" => Ok(SkillCategory::Language),
            "music" => Ok(SkillCategory::Music),
            "art" => Ok(SkillCategory::Art),
            "sport" => Ok(SkillCategory::Sport),
            "business" => Ok(SkillCategory::Business),
            "other" => Ok(SkillCategory::Other),
            _ => Err(format!("unknown skill category: {}", s)),
        }
    }
}

/// Proficiency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Expert => "expert",
        }
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "expert" => Ok(SkillLevel::Expert),
            _ => Err(format!("unknown skill level: {}", s)),
        }
    }
}

/// One logged practice session, embedded in its skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeLog {
    /// When the practice happened
    pub date: DateTime<Utc>,
    /// Duration in minutes; at least 1
    pub duration_minutes: i64,
    /// Optional notes about the session
    pub notes: Option<String>,
}

/// A skill being practiced toward a target number of hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub category: SkillCategory,
    pub level: SkillLevel,
    /// Hours needed to reach the next level
    pub target_hours: f64,
    /// Running total across all practice logs
    pub total_hours: f64,
    /// Embedded practice history, stored as a JSON column
    pub practice_logs: Vec<PracticeLog>,
    /// Whether the skill is currently being practiced
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Skill {
    /// Create an active skill with a fresh id and no practice history.
    pub fn new(
        owner_id: impl Into<String>,
        name: impl Into<String>,
        category: SkillCategory,
        created_at: DateTime<Utc>,
    ) -> Self {
        Skill {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            description: None,
            category,
            level: SkillLevel::Beginner,
            target_hours: 100.0,
            total_hours: 0.0,
            practice_logs: Vec::new(),
            is_active: true,
            created_at,
        }
    }

    /// Progress toward the hour target, capped at 100.
    pub fn progress(&self) -> i64 {
        if self.target_hours == 0.0 {
            return 0;
        }
        let pct = ((self.total_hours / self.target_hours) * 100.0).round() as i64;
        pct.min(100)
    }

    /// Number of logged practice sessions.
    pub fn total_sessions(&self) -> usize {
        self.practice_logs.len()
    }

    /// Append a practice session and add its duration to the hour total.
    pub fn log_practice(&mut self, date: DateTime<Utc>, duration_minutes: i64, notes: Option<String>) {
        self.practice_logs.push(PracticeLog {
            date,
            duration_minutes,
            notes,
        });
        self.total_hours += duration_minutes as f64 / 60.0;
    }
}

// ============================================
// Reflection
// ============================================

/// Mood recorded for the week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Excellent,
    Good,
    Neutral,
    Challenging,
    Difficult,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Excellent => "excellent",
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Challenging => "challenging",
            Mood::Difficult => "difficult",
        }
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(Mood::Excellent),
            "good" => Ok(Mood::Good),
            "neutral" => Ok(Mood::Neutral),
            "challenging" => Ok(Mood::Challenging),
            "difficult" => Ok(Mood::Difficult),
            _ => Err(format!("unknown mood: {}", s)),
        }
    }
}

/// A weekly reflection entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reflection {
    pub id: String,
    pub owner_id: String,
    /// Monday of the week being reflected on
    pub week_start_date: NaiveDate,
    /// Sunday of the same week
    pub week_end_date: NaiveDate,
    /// Rating from 1 to 10
    pub week_rating: i64,
    pub mood: Mood,
    /// Wins of the week
    pub wins: Vec<String>,
    /// Challenges of the week
    pub challenges: Vec<String>,
    /// Lessons learned
    pub lessons: Vec<String>,
    /// Whether the entry was filled out completely
    pub is_complete: bool,
    pub created_at: DateTime<Utc>,
}

impl Reflection {
    /// Create a complete reflection for the week starting at
    /// `week_start_date`, with a fresh id.
    pub fn new(
        owner_id: impl Into<String>,
        week_start_date: NaiveDate,
        week_rating: i64,
        mood: Mood,
        created_at: DateTime<Utc>,
    ) -> Self {
        Reflection {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            week_start_date,
            week_end_date: week_start_date + chrono::Days::new(6),
            week_rating,
            mood,
            wins: Vec::new(),
            challenges: Vec::new(),
            lessons: Vec::new(),
            is_complete: true,
            created_at,
        }
    }
}
