//! Domain model for the task tracker.
//!
//! # Responsibility
//! - Define the records shared by the store, repositories and FFI callers.
//! - Own the wall-clock helper so every layer stamps time the same way.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId` assigned once.
//! - Timestamps are Unix epoch milliseconds (UTC).

pub mod session;
pub mod task;

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
