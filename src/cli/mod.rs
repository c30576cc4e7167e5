//! CLI module for the snaprun test runner
//!
//! ## Commands
//!
//! - `test` (default) - Run every fixture against its snapshot
//! - `regenerate` / `regen` - Overwrite every snapshot with a fresh result
//! - `test-<name>` - Run a single fixture
//!
//! Anything else prints usage together with the available fixtures.
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `config` - Paths, timeout and colors
//! - `executor` - Running the target program
//! - `reporter` - Console output
//! - `snapshot` - Snapshot files and fixture discovery
//! - `test_runner` - Per-fixture orchestration
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros. The command word is a free-form positional because
//! `test-<name>` embeds the fixture name.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod config;
pub mod executor;
pub mod reporter;
pub mod snapshot;
pub mod test_runner;

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use self::config::{DEFAULT_TIMEOUT_SECS, Palette, RunnerConfig};
use self::reporter::SummaryMode;
use crate::version::SNAPRUN_VERSION;

// ============================================================================
// Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Failure whose details were already printed by the reporter.
    pub fn reported() -> Self {
        Self::new("", ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<RunnerError> for CliError {
    fn from(err: RunnerError) -> Self {
        CliError::failure(format!("Error: {err}"))
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Failures of the runner itself, as opposed to failures of the program under test.
///
/// Target misbehavior is always captured in a result record. In a full run these errors are reported per fixture;
/// elsewhere they abort the command.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot create snapshots directory {}: {source}", path.display())]
    SnapshotDir { path: PathBuf, source: std::io::Error },

    #[error("cannot read fixtures directory {}: {source}", path.display())]
    FixturesDir { path: PathBuf, source: std::io::Error },

    #[error("cannot read snapshot {}: {source}", path.display())]
    ReadSnapshot { path: PathBuf, source: std::io::Error },

    #[error("cannot write snapshot {}: {source}", path.display())]
    WriteSnapshot { path: PathBuf, source: std::io::Error },

    #[error("cannot encode snapshot {}: {source}", path.display())]
    EncodeSnapshot { path: PathBuf, source: serde_json::Error },
}

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Snapshot test runner for compiled programs
#[derive(Parser, Debug)]
#[command(name = "snaprun")]
#[command(version = SNAPRUN_VERSION)]
#[command(about = "Run a program against fixture files and compare its output with recorded snapshots", long_about = None)]
pub struct Cli {
    /// Command to run: test, regenerate/regen, or test-<fixture>
    #[arg(value_name = "COMMAND", default_value = "test")]
    pub command: String,

    /// CI mode (changes the summary wording; the run still fails on any differing snapshot)
    #[arg(long)]
    pub ci: bool,

    /// Show detailed diff output for differing snapshots
    #[arg(short, long)]
    pub verbose: bool,

    /// Program under test, invoked as `<TARGET> <fixture>`
    #[arg(long, value_name = "PATH", env = "SNAPRUN_TARGET")]
    pub target: Option<PathBuf>,

    /// Directory containing `*.js` fixtures
    #[arg(long, value_name = "DIR", env = "SNAPRUN_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// Directory containing `<fixture>.js.snap` snapshots
    #[arg(long, value_name = "DIR", env = "SNAPRUN_SNAPSHOTS")]
    pub snapshots: Option<PathBuf>,

    /// Wall-clock limit per fixture, in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Disable colored output (also honored: NO_COLOR)
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Resolve flags (and their environment fallbacks) over the defaults.
    pub fn config(&self) -> RunnerConfig {
        let mut config = RunnerConfig::new()
            .with_timeout(Duration::from_secs(self.timeout))
            .with_palette(Palette::select(self.no_color, env::var_os("NO_COLOR").as_deref()));
        if let Some(target) = &self.target {
            config = config.with_target(target);
        }
        if let Some(dir) = &self.fixtures {
            config = config.with_fixtures_dir(dir);
        }
        if let Some(dir) = &self.snapshots {
            config = config.with_snapshots_dir(dir);
        }
        config
    }

    pub fn summary_mode(&self) -> SummaryMode {
        if self.ci { SummaryMode::Ci } else { SummaryMode::Normal }
    }
}

/// The command word, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunnerCommand {
    TestAll,
    Regenerate,
    TestOne(String),
    Unknown(String),
}

impl RunnerCommand {
    pub fn parse(word: &str) -> Self {
        match word {
            "test" => RunnerCommand::TestAll,
            "regenerate" | "regen" => RunnerCommand::Regenerate,
            _ => match word.strip_prefix("test-") {
                Some(name) => RunnerCommand::TestOne(name.to_string()),
                None => RunnerCommand::Unknown(word.to_string()),
            },
        }
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    let config = cli.config();
    tracing::debug!(?config, command = %cli.command, "resolved configuration");

    match RunnerCommand::parse(&cli.command) {
        RunnerCommand::TestAll => commands::test_all(&config, cli.summary_mode(), cli.verbose),
        RunnerCommand::Regenerate => commands::regenerate(&config),
        RunnerCommand::TestOne(name) => commands::test_fixture(&config, &name, cli.verbose),
        RunnerCommand::Unknown(word) => {
            tracing::debug!(%word, "unrecognized command");
            let program = env::args().next().unwrap_or_else(|| "snaprun".to_string());
            commands::usage(&config, &program)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
