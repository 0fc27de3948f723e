//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id               TEXT PRIMARY KEY,
        owner_id         TEXT NOT NULL,
        title            TEXT NOT NULL,
        description      TEXT,
        status           TEXT NOT NULL,      -- 'pending', 'in-progress', 'completed'
        priority         TEXT NOT NULL,      -- 'low', 'medium', 'high'
        due_date         TEXT,               -- YYYY-MM-DD
        created_at       DATETIME NOT NULL,
        updated_at       DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS goals (
        id               TEXT PRIMARY KEY,
        owner_id         TEXT NOT NULL,
        title            TEXT NOT NULL,
        description      TEXT,
        status           TEXT NOT NULL,      -- 'active', 'completed', 'failed', 'paused'
        target           INTEGER NOT NULL,
        current          INTEGER NOT NULL,
        period           TEXT NOT NULL,      -- 'daily', 'weekly', 'monthly'
        start_date       DATETIME NOT NULL,
        end_date         DATETIME NOT NULL,
        created_at       DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS skills (
        id               TEXT PRIMARY KEY,
        owner_id         TEXT NOT NULL,
        name             TEXT NOT NULL,
        description      TEXT,
        category         TEXT NOT NULL,
        level            TEXT NOT NULL,
        target_hours     REAL NOT NULL,
        total_hours      REAL NOT NULL,
        practice_logs    JSON NOT NULL,      -- embedded practice history
        is_active        INTEGER NOT NULL,
        created_at       DATETIME NOT NULL
    );

    CREATE TABLE IF NOT EXISTS reflections (
        id               TEXT PRIMARY KEY,
        owner_id         TEXT NOT NULL,
        week_start_date  TEXT NOT NULL,      -- YYYY-MM-DD
        week_end_date    TEXT NOT NULL,      -- YYYY-MM-DD
        week_rating      INTEGER NOT NULL,
        mood             TEXT NOT NULL,
        wins             JSON NOT NULL,
        challenges       JSON NOT NULL,
        lessons          JSON NOT NULL,
        is_complete      INTEGER NOT NULL,
        created_at       DATETIME NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_tasks_owner_created ON tasks(owner_id, created_at);
    CREATE INDEX IF NOT EXISTS idx_tasks_owner_status ON tasks(owner_id, status);
    CREATE INDEX IF NOT EXISTS idx_goals_owner ON goals(owner_id);
    CREATE INDEX IF NOT EXISTS idx_goals_owner_status ON goals(owner_id, status);
    CREATE INDEX IF NOT EXISTS idx_skills_owner ON skills(owner_id);
    CREATE INDEX IF NOT EXISTS idx_reflections_owner_week ON reflections(owner_id, week_start_date);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute(&format!("PRAGMA user_version = {}", version), [])?;
        }
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn test_tables_created() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["tasks", "goals", "skills", "reflections"] {
            let exists: i32 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                    [table],
                    |r| r.get(0),
                )
                .unwrap();
            assert_eq!(exists, 1, "Table {} should exist", table);
        }
    }
}
