//! Data source abstractions behind the task store.
//!
//! # Responsibility
//! - Define the async capabilities the store depends on: task CRUD and
//!   session sign-out.
//! - Provide the mock (seeded, simulated latency) and SQLite implementations.
//!
//! # Invariants
//! - Implementations report unknown IDs as `RepoError::NotFound`, or accept
//!   them silently when they have no storage to check against (mock).
//! - The store never talks to storage except through these traits.

pub mod mock_repo;
pub mod sqlite_repo;
pub mod task_repo;
