//! Command orchestration layer.
//!
//! Every public handler takes the caller's `owner_id` first and the
//! connection last. Rows owned by someone else are reported as not found.
//!
//! ## Logging Ownership
//!
//! Public handlers own lifecycle logging for their operation:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! The batch coordinator calls the unlogged `*_impl` functions so each
//! batch emits one start/end pair. Lower layers (store, core) use only
//! `tracing::debug!()`.

mod access;
pub mod batch;
pub mod engine_command;
pub mod lifecycle;
pub mod ordering;
pub mod queries;

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
