//! navdeck Store - SQLite persistence for groups and sites
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - Connection configuration (busy timeout, journal mode, IMMEDIATE transactions)
//! - Row-level repository used by the engine's command handlers

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use db::StoreConfig;
pub use errors::Result;
pub use repo::SqliteRepo;
