//! navdeck Engine - Orchestration layer
//!
//! Command handlers for the ordering engine, the lifecycle engine, and the
//! batch coordinator. Each handler applies navdeck-core rules to rows read
//! through navdeck-store and commits its writes in one transaction.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
