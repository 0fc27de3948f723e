//! Database layer for momentum
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - Owner-scoped finders consumed by the analytics engine

pub mod repo;
pub mod schema;

pub use repo::{Database, TaskFilter};
