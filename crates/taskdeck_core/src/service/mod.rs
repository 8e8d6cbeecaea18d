//! Use-case layer over the data source.
//!
//! # Responsibility
//! - Hold the shared app state and run task/session operations against it.
//! - Derive read-only projections (stats, filtered lists) for the UI.

pub mod stats;
pub mod task_store;
