//! Provide the result record, structural comparison and run tallies for the snaprun test runner.
//!
//! This crate is intentionally small and dependency-light. Everything here is deterministic and side-effect free so
//! the runner and its tests can share one definition of "what was observed" and "what changed".
//!
//! ## Notes
//!
//! - **No IO**: spawning the target, reading fixtures and writing snapshot files all live in the `snaprun` crate.
//! - The serialized shape of [`ResultRecord`] *is* the structured snapshot format, so field names and order are part
//!   of the on-disk contract.

pub mod compare;
pub mod record;
pub mod tally;

pub use compare::{Difference, StatusChange, compare};
pub use record::{LAUNCH_FAILURE_EXIT_CODE, ResultRecord, Status, TIMEOUT_EXIT_CODE};
pub use tally::RunTally;
