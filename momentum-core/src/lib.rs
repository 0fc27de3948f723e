//! # momentum-core
//!
//! Core library for momentum - a personal productivity tracker.
//!
//! This library provides:
//! - Domain types for tasks, goals, skills, and weekly reflections
//! - Database storage layer with SQLite
//! - The analytics engine (streaks, consistency, heatmap, insights)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Records are owned by exactly one user and stored in SQLite; the
//! analytics engine is a set of pure functions over fetched records.
//! Derived values (streaks, rollups, heatmaps, insights) are computed
//! per request and never persisted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use momentum_core::analytics;
//! use momentum_core::clock::SystemClock;
//! use momentum_core::{Config, Database};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&config.database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let clock = SystemClock;
//! let tasks = db.find_tasks("user-1", None).expect("query failed");
//! let buckets = analytics::group_by_day(&tasks);
//! let streak = analytics::calculate_streak(&buckets, &clock);
//! println!("current streak: {} days", streak.current_streak);
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use db::{Database, TaskFilter};
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analytics;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
