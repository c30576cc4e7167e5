#![forbid(unsafe_code)]
//! snaprun: snapshot test runner
//!
//! snaprun invokes an external program against a directory of fixture files, captures exit code, stdout and stderr,
//! and compares them against snapshots recorded by an earlier run. Missing snapshots are created on first run;
//! `regen` re-records all of them.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **Target failures are data**: a target that crashes, hangs or cannot be launched yields a failing result record,
//!   never a runner error.

pub mod cli;
pub mod version;

pub use snaprun_core::{Difference, ResultRecord, RunTally, Status, StatusChange, compare};

pub use cli::config::{Palette, RunnerConfig};
pub use cli::executor::{Execution, ProcessExecutor, ProgramExecutor};
pub use cli::reporter::{ConsoleReporter, SnapshotReporter, SummaryMode};
pub use cli::snapshot::{Fixture, decode_snapshot, encode_snapshot, load_snapshot, save_snapshot};
pub use cli::test_runner::{FixtureOutcome, SnapshotRunner};
