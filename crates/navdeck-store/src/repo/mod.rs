//! Repository layer persisting groups and sites to SQLite
//!
//! Row-level reads and writes only. Rules live in navdeck-core and are
//! enforced by the engine, which also owns transaction boundaries.

mod rows;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
