//! Database repository layer
//!
//! Provides query and mutation operations for all record types. Every
//! query takes an `owner_id` and touches only that owner's rows; there
//! is deliberately no finder that crosses owners.

use crate::analytics::TimeWindow;
use crate::error::{Error, Result};
use crate::types::*;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Mutex;

/// Optional filters for task queries.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Restrict to tasks created inside the window
    pub window: Option<TimeWindow>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Cap the number of returned rows
    pub limit: Option<usize>,
}

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

/// Map a malformed stored value to a conversion failure instead of
/// silently substituting a default. A row that cannot be parsed fails
/// the query; unknown status strings never reach the analytics engine.
fn conversion_err(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(0, Type::Text, message.into())
}

fn parse_enum<T>(value: String) -> rusqlite::Result<T>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(conversion_err)
}

fn parse_ts(value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(format!("bad timestamp {:?}: {}", value, e)))
}

fn parse_day(value: String) -> rusqlite::Result<NaiveDate> {
    value
        .parse()
        .map_err(|e| conversion_err(format!("bad date {:?}: {}", value, e)))
}

fn parse_json<T: serde::de::DeserializeOwned>(value: String) -> rusqlite::Result<T> {
    serde_json::from_str(&value).map_err(|e| conversion_err(format!("bad JSON column: {}", e)))
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL mode for better concurrency
        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        super::schema::run_migrations(&conn)
    }

    // ============================================
    // Task operations
    // ============================================

    /// Insert a new task
    pub fn insert_task(&self, task: &Task) -> Result<()> {
        if task.title.trim().is_empty() {
            return Err(Error::InvalidArgument("task title is required".to_string()));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO tasks (id, owner_id, title, description, status, priority,
                               due_date, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                task.id,
                task.owner_id,
                task.title,
                task.description,
                task.status.as_str(),
                task.priority.as_str(),
                task.due_date.map(|d| d.to_string()),
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(task_id = %task.id, owner_id = %task.owner_id, "Inserted task");
        Ok(())
    }

    /// Get one task owned by `owner_id`
    pub fn get_task(&self, owner_id: &str, id: &str) -> Result<Option<Task>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM tasks WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
            Self::row_to_task,
        )
        .optional()
        .map_err(Error::from)
    }

    /// List one owner's tasks with optional filtering
    pub fn list_tasks(&self, owner_id: &str, filter: &TaskFilter) -> Result<Vec<Task>> {
        let conn = self.conn.lock().unwrap();

        let mut sql = String::from("SELECT * FROM tasks WHERE owner_id = ?");
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id.to_string())];

        if let Some(window) = &filter.window {
            sql.push_str(" AND created_at >= ? AND created_at <= ?");
            params.push(Box::new(window.start.to_rfc3339()));
            params.push(Box::new(window.end.to_rfc3339()));
        }

        if let Some(status) = &filter.status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status.as_str().to_string()));
        }

        if let Some(priority) = &filter.priority {
            sql.push_str(" AND priority = ?");
            params.push(Box::new(priority.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at");

        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(params_refs.as_slice(), Self::row_to_task)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    /// All tasks for an owner, optionally restricted to a window.
    ///
    /// This is the finder the analytics engine consumes; callers must
    /// not rely on row order.
    pub fn find_tasks(&self, owner_id: &str, window: Option<&TimeWindow>) -> Result<Vec<Task>> {
        self.list_tasks(
            owner_id,
            &TaskFilter {
                window: window.copied(),
                ..TaskFilter::default()
            },
        )
    }

    /// Change a task's status, bumping `updated_at`
    pub fn set_task_status(
        &self,
        owner_id: &str,
        id: &str,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Task> {
        {
            let conn = self.conn.lock().unwrap();
            let changed = conn.execute(
                "UPDATE tasks SET status = ?1, updated_at = ?2 WHERE owner_id = ?3 AND id = ?4",
                params![status.as_str(), updated_at.to_rfc3339(), owner_id, id],
            )?;
            if changed == 0 {
                return Err(Error::not_found("task", id));
            }
        }

        tracing::debug!(task_id = %id, status = %status, "Updated task status");
        self.get_task(owner_id, id)?
            .ok_or_else(|| Error::not_found("task", id))
    }

    /// Delete a task
    pub fn delete_task(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM tasks WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("task", id));
        }
        Ok(())
    }

    fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let status: String = row.get("status")?;
        let priority: String = row.get("priority")?;
        let due_date: Option<String> = row.get("due_date")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Task {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: parse_enum(status)?,
            priority: parse_enum(priority)?,
            due_date: due_date.map(parse_day).transpose()?,
            created_at: parse_ts(created_at)?,
            updated_at: parse_ts(updated_at)?,
        })
    }

    // ============================================
    // Goal operations
    // ============================================

    /// Insert a new goal
    pub fn insert_goal(&self, goal: &Goal) -> Result<()> {
        if goal.target < 1 {
            return Err(Error::InvalidArgument(format!(
                "goal target must be at least 1, got {}",
                goal.target
            )));
        }
        if goal.end_date < goal.start_date {
            return Err(Error::InvalidArgument(
                "goal end date is before its start date".to_string(),
            ));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO goals (id, owner_id, title, description, status, target,
                               current, period, start_date, end_date, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                goal.id,
                goal.owner_id,
                goal.title,
                goal.description,
                goal.status.as_str(),
                goal.target,
                goal.current,
                goal.period.as_str(),
                goal.start_date.to_rfc3339(),
                goal.end_date.to_rfc3339(),
                goal.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(goal_id = %goal.id, owner_id = %goal.owner_id, "Inserted goal");
        Ok(())
    }

    /// Get one goal owned by `owner_id`
    pub fn get_goal(&self, owner_id: &str, id: &str) -> Result<Option<Goal>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM goals WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
            Self::row_to_goal,
        )
        .optional()
        .map_err(Error::from)
    }

    /// All goals for an owner
    pub fn find_goals(&self, owner_id: &str) -> Result<Vec<Goal>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM goals WHERE owner_id = ?")?;
        let goals = stmt
            .query_map([owner_id], Self::row_to_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Goals whose `[start_date, end_date]` span overlaps the window
    pub fn find_goals_overlapping(
        &self,
        owner_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Goal>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM goals WHERE owner_id = ?1 AND start_date <= ?2 AND end_date >= ?3",
        )?;
        let goals = stmt
            .query_map(
                params![owner_id, window.end.to_rfc3339(), window.start.to_rfc3339()],
                Self::row_to_goal,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(goals)
    }

    /// Bump a goal's progress counter and re-run its completion check
    pub fn update_goal_progress(&self, owner_id: &str, id: &str, increment: i64) -> Result<Goal> {
        let mut goal = self
            .get_goal(owner_id, id)?
            .ok_or_else(|| Error::not_found("goal", id))?;

        goal.update_progress(increment);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE goals SET current = ?1, status = ?2 WHERE owner_id = ?3 AND id = ?4",
            params![goal.current, goal.status.as_str(), owner_id, id],
        )?;

        tracing::debug!(goal_id = %id, current = goal.current, "Updated goal progress");
        Ok(goal)
    }

    /// Delete a goal
    pub fn delete_goal(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM goals WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("goal", id));
        }
        Ok(())
    }

    fn row_to_goal(row: &Row) -> rusqlite::Result<Goal> {
        let status: String = row.get("status")?;
        let period: String = row.get("period")?;
        let start_date: String = row.get("start_date")?;
        let end_date: String = row.get("end_date")?;
        let created_at: String = row.get("created_at")?;

        Ok(Goal {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: parse_enum(status)?,
            target: row.get("target")?,
            current: row.get("current")?,
            period: parse_enum(period)?,
            start_date: parse_ts(start_date)?,
            end_date: parse_ts(end_date)?,
            created_at: parse_ts(created_at)?,
        })
    }

    // ============================================
    // Skill operations
    // ============================================

    /// Insert a new skill
    pub fn insert_skill(&self, skill: &Skill) -> Result<()> {
        if skill.name.trim().is_empty() {
            return Err(Error::InvalidArgument("skill name is required".to_string()));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO skills (id, owner_id, name, description, category, level,
                                target_hours, total_hours, practice_logs, is_active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                skill.id,
                skill.owner_id,
                skill.name,
                skill.description,
                skill.category.as_str(),
                skill.level.as_str(),
                skill.target_hours,
                skill.total_hours,
                serde_json::to_string(&skill.practice_logs)?,
                skill.is_active,
                skill.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(skill_id = %skill.id, owner_id = %skill.owner_id, "Inserted skill");
        Ok(())
    }

    /// Get one skill owned by `owner_id`
    pub fn get_skill(&self, owner_id: &str, id: &str) -> Result<Option<Skill>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT * FROM skills WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
            Self::row_to_skill,
        )
        .optional()
        .map_err(Error::from)
    }

    /// All skills for an owner
    pub fn find_skills(&self, owner_id: &str) -> Result<Vec<Skill>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM skills WHERE owner_id = ?")?;
        let skills = stmt
            .query_map([owner_id], Self::row_to_skill)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(skills)
    }

    /// Append a practice session to a skill and update its hour total
    pub fn log_practice(
        &self,
        owner_id: &str,
        id: &str,
        date: DateTime<Utc>,
        duration_minutes: i64,
        notes: Option<String>,
    ) -> Result<Skill> {
        if duration_minutes < 1 {
            return Err(Error::InvalidArgument(format!(
                "practice duration must be at least 1 minute, got {}",
                duration_minutes
            )));
        }

        let mut skill = self
            .get_skill(owner_id, id)?
            .ok_or_else(|| Error::not_found("skill", id))?;

        skill.log_practice(date, duration_minutes, notes);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE skills SET total_hours = ?1, practice_logs = ?2 WHERE owner_id = ?3 AND id = ?4",
            params![
                skill.total_hours,
                serde_json::to_string(&skill.practice_logs)?,
                owner_id,
                id
            ],
        )?;

        tracing::debug!(
            skill_id = %id,
            duration_minutes,
            total_hours = skill.total_hours,
            "Logged practice session"
        );
        Ok(skill)
    }

    /// Delete a skill
    pub fn delete_skill(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM skills WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("skill", id));
        }
        Ok(())
    }

    fn row_to_skill(row: &Row) -> rusqlite::Result<Skill> {
        let category: String = row.get("category")?;
        let level: String = row.get("level")?;
        let practice_logs: String = row.get("practice_logs")?;
        let created_at: String = row.get("created_at")?;

        Ok(Skill {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            name: row.get("name")?,
            description: row.get("description")?,
            category: parse_enum(category)?,
            level: parse_enum(level)?,
            target_hours: row.get("target_hours")?,
            total_hours: row.get("total_hours")?,
            practice_logs: parse_json(practice_logs)?,
            is_active: row.get("is_active")?,
            created_at: parse_ts(created_at)?,
        })
    }

    // ============================================
    // Reflection operations
    // ============================================

    /// Insert a new weekly reflection
    pub fn insert_reflection(&self, reflection: &Reflection) -> Result<()> {
        if !(1..=10).contains(&reflection.week_rating) {
            return Err(Error::InvalidArgument(format!(
                "week rating must be between 1 and 10, got {}",
                reflection.week_rating
            )));
        }
        if reflection.week_end_date < reflection.week_start_date {
            return Err(Error::InvalidArgument(
                "reflection week ends before it starts".to_string(),
            ));
        }

        let conn = self.conn.lock().unwrap();
        conn.execute(
            r#"
            INSERT INTO reflections (id, owner_id, week_start_date, week_end_date, week_rating,
                                     mood, wins, challenges, lessons, is_complete, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                reflection.id,
                reflection.owner_id,
                reflection.week_start_date.to_string(),
                reflection.week_end_date.to_string(),
                reflection.week_rating,
                reflection.mood.as_str(),
                serde_json::to_string(&reflection.wins)?,
                serde_json::to_string(&reflection.challenges)?,
                serde_json::to_string(&reflection.lessons)?,
                reflection.is_complete,
                reflection.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!(
            reflection_id = %reflection.id,
            owner_id = %reflection.owner_id,
            "Inserted reflection"
        );
        Ok(())
    }

    /// All reflections for an owner
    pub fn find_reflections(&self, owner_id: &str) -> Result<Vec<Reflection>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT * FROM reflections WHERE owner_id = ?")?;
        let reflections = stmt
            .query_map([owner_id], Self::row_to_reflection)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reflections)
    }

    /// Reflections whose week starts inside the window
    pub fn find_reflections_in(
        &self,
        owner_id: &str,
        window: &TimeWindow,
    ) -> Result<Vec<Reflection>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT * FROM reflections
             WHERE owner_id = ?1 AND week_start_date >= ?2 AND week_start_date <= ?3",
        )?;
        let reflections = stmt
            .query_map(
                params![
                    owner_id,
                    window.start_date().to_string(),
                    window.end_date().to_string()
                ],
                Self::row_to_reflection,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(reflections)
    }

    /// Delete a reflection
    pub fn delete_reflection(&self, owner_id: &str, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM reflections WHERE owner_id = ?1 AND id = ?2",
            params![owner_id, id],
        )?;
        if changed == 0 {
            return Err(Error::not_found("reflection", id));
        }
        Ok(())
    }

    fn row_to_reflection(row: &Row) -> rusqlite::Result<Reflection> {
        let week_start: String = row.get("week_start_date")?;
        let week_end: String = row.get("week_end_date")?;
        let mood: String = row.get("mood")?;
        let wins: String = row.get("wins")?;
        let challenges: String = row.get("challenges")?;
        let lessons: String = row.get("lessons")?;
        let created_at: String = row.get("created_at")?;

        Ok(Reflection {
            id: row.get("id")?,
            owner_id: row.get("owner_id")?,
            week_start_date: parse_day(week_start)?,
            week_end_date: parse_day(week_end)?,
            week_rating: row.get("week_rating")?,
            mood: parse_enum(mood)?,
            wins: parse_json(wins)?,
            challenges: parse_json(challenges)?,
            lessons: parse_json(lessons)?,
            is_complete: row.get("is_complete")?,
            created_at: parse_ts(created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{Clock, FixedClock};

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn clock() -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
    }

    fn make_task(owner: &str, created_at: DateTime<Utc>) -> Task {
        Task {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.to_string(),
            title: "Write weekly report".to_string(),
            description: Some("for the team sync".to_string()),
            status: TaskStatus::Pending,
            priority: TaskPriority::High,
            due_date: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_task_crud_round_trip() {
        let db = test_db();
        let now = clock().now();
        let task = make_task("alice", now);

        db.insert_task(&task).unwrap();

        let loaded = db.get_task("alice", &task.id).unwrap().unwrap();
        assert_eq!(loaded.title, task.title);
        assert_eq!(loaded.status, TaskStatus::Pending);
        assert_eq!(loaded.created_at, task.created_at);

        let updated = db
            .set_task_status("alice", &task.id, TaskStatus::Completed, now)
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);

        db.delete_task("alice", &task.id).unwrap();
        assert!(db.get_task("alice", &task.id).unwrap().is_none());
        assert!(matches!(
            db.delete_task("alice", &task.id),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_task_queries_are_owner_scoped() {
        let db = test_db();
        let now = clock().now();

        db.insert_task(&make_task("alice", now)).unwrap();
        let bob_task = make_task("bob", now);
        db.insert_task(&bob_task).unwrap();

        assert_eq!(db.find_tasks("alice", None).unwrap().len(), 1);
        assert_eq!(db.find_tasks("bob", None).unwrap().len(), 1);
        // Alice cannot reach Bob's task by id.
        assert!(db.get_task("alice", &bob_task.id).unwrap().is_none());
        assert!(matches!(
            db.set_task_status("alice", &bob_task.id, TaskStatus::Completed, now),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_task_window_and_status_filters() {
        let db = test_db();
        let clock = clock();

        let in_window = make_task("alice", clock.now());
        let out_of_window = make_task(
            "alice",
            NaiveDate::from_ymd_opt(2023, 11, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
                .and_utc(),
        );
        db.insert_task(&in_window).unwrap();
        db.insert_task(&out_of_window).unwrap();

        let window = TimeWindow::last_n_days(&clock, 30).unwrap();
        let found = db.find_tasks("alice", Some(&window)).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, in_window.id);

        let completed = db
            .list_tasks(
                "alice",
                &TaskFilter {
                    status: Some(TaskStatus::Completed),
                    ..TaskFilter::default()
                },
            )
            .unwrap();
        assert!(completed.is_empty());
    }

    #[test]
    fn test_insert_task_requires_title() {
        let db = test_db();
        let mut task = make_task("alice", clock().now());
        task.title = "   ".to_string();
        assert!(matches!(
            db.insert_task(&task),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_goal_progress_flips_to_completed() {
        let db = test_db();
        let now = clock().now();

        let goal = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            title: "Ship five features".to_string(),
            description: None,
            status: GoalStatus::Active,
            target: 2,
            current: 0,
            period: GoalPeriod::Monthly,
            start_date: now,
            end_date: now + chrono::Duration::days(30),
            created_at: now,
        };
        db.insert_goal(&goal).unwrap();

        let after_one = db.update_goal_progress("alice", &goal.id, 1).unwrap();
        assert_eq!(after_one.status, GoalStatus::Active);
        assert_eq!(after_one.current, 1);

        let after_two = db.update_goal_progress("alice", &goal.id, 1).unwrap();
        assert_eq!(after_two.status, GoalStatus::Completed);

        // Persisted, not just in the returned value.
        let loaded = db.get_goal("alice", &goal.id).unwrap().unwrap();
        assert_eq!(loaded.status, GoalStatus::Completed);
    }

    #[test]
    fn test_insert_goal_validates_target() {
        let db = test_db();
        let now = clock().now();
        let goal = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            title: "Bad goal".to_string(),
            description: None,
            status: GoalStatus::Active,
            target: 0,
            current: 0,
            period: GoalPeriod::Weekly,
            start_date: now,
            end_date: now,
            created_at: now,
        };
        assert!(matches!(
            db.insert_goal(&goal),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_goal_overlap_finder() {
        let db = test_db();
        let clock = clock();
        let now = clock.now();

        let overlapping = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            title: "January goal".to_string(),
            description: None,
            status: GoalStatus::Active,
            target: 5,
            current: 0,
            period: GoalPeriod::Monthly,
            start_date: now - chrono::Duration::days(20),
            end_date: now + chrono::Duration::days(10),
            created_at: now,
        };
        let past = Goal {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            title: "Last year".to_string(),
            description: None,
            status: GoalStatus::Completed,
            target: 5,
            current: 5,
            period: GoalPeriod::Monthly,
            start_date: now - chrono::Duration::days(400),
            end_date: now - chrono::Duration::days(370),
            created_at: now,
        };
        db.insert_goal(&overlapping).unwrap();
        db.insert_goal(&past).unwrap();

        let window = TimeWindow::last_n_days(&clock, 7).unwrap();
        let found = db.find_goals_overlapping("alice", &window).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, overlapping.id);
        assert_eq!(db.find_goals("alice").unwrap().len(), 2);
    }

    #[test]
    fn test_skill_practice_log_round_trip() {
        let db = test_db();
        let now = clock().now();

        let skill = Skill {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            name: "Spanish".to_string(),
            description: None,
            category: SkillCategory::Language,
            level: SkillLevel::Beginner,
            target_hours: 100.0,
            total_hours: 0.0,
            practice_logs: vec![],
            is_active: true,
            created_at: now,
        };
        db.insert_skill(&skill).unwrap();

        let updated = db
            .log_practice("alice", &skill.id, now, 45, Some("verbs".to_string()))
            .unwrap();
        assert_eq!(updated.practice_logs.len(), 1);
        assert!((updated.total_hours - 0.75).abs() < 1e-9);

        // Logs survive the JSON column round trip.
        let loaded = db.get_skill("alice", &skill.id).unwrap().unwrap();
        assert_eq!(loaded.practice_logs.len(), 1);
        assert_eq!(loaded.practice_logs[0].duration_minutes, 45);
        assert_eq!(loaded.practice_logs[0].notes.as_deref(), Some("verbs"));

        assert!(matches!(
            db.log_practice("alice", &skill.id, now, 0, None),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_reflection_validation_and_window_finder() {
        let db = test_db();
        let clock = clock();
        let now = clock.now();

        let reflection = Reflection {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: "alice".to_string(),
            week_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            week_end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            week_rating: 8,
            mood: Mood::Good,
            wins: vec!["shipped the release".to_string()],
            challenges: vec![],
            lessons: vec!["start earlier".to_string()],
            is_complete: true,
            created_at: now,
        };
        db.insert_reflection(&reflection).unwrap();

        let mut bad = reflection.clone();
        bad.id = uuid::Uuid::new_v4().to_string();
        bad.week_rating = 11;
        assert!(matches!(
            db.insert_reflection(&bad),
            Err(Error::InvalidArgument(_))
        ));

        let window = TimeWindow::last_n_days(&clock, 30).unwrap();
        let found = db.find_reflections_in("alice", &window).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].wins, vec!["shipped the release".to_string()]);

        let old_window = TimeWindow::for_dates(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        )
        .unwrap();
        assert!(db.find_reflections_in("alice", &old_window).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_status_row_fails_query() {
        let db = test_db();
        let now = clock().now();
        let task = make_task("alice", now);
        db.insert_task(&task).unwrap();

        // Corrupt the row behind the typed API's back.
        {
            let conn = db.conn.lock().unwrap();
            conn.execute(
                "UPDATE tasks SET status = 'archived' WHERE id = ?",
                [&task.id],
            )
            .unwrap();
        }

        // The query surfaces the bad row instead of silently dropping the
        // status from the counters.
        assert!(db.get_task("alice", &task.id).is_err());
    }
}
