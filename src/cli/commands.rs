//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io::{self, Write};

use super::config::RunnerConfig;
use super::executor::ProcessExecutor;
use super::reporter::{ConsoleReporter, SummaryMode};
use super::snapshot::discover_fixtures;
use super::test_runner::SnapshotRunner;
use super::{CliError, CliResult, ExitCode};

/// Run every fixture against its snapshot. Fails iff any snapshot differs.
pub fn test_all(config: &RunnerConfig, mode: SummaryMode, verbose: bool) -> CliResult<ExitCode> {
    let executor = ProcessExecutor::from_config(config);
    let mut reporter = ConsoleReporter::stdout(config.palette, verbose);

    let tally = SnapshotRunner::new(config, &executor, &mut reporter).run_all(mode)?;

    if tally.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Summary already printed
        Err(CliError::reported())
    }
}

/// Run the fixture `<fixtures_dir>/<name>.js`. Fails if it is missing or its snapshot differs.
pub fn test_fixture(config: &RunnerConfig, name: &str, verbose: bool) -> CliResult<ExitCode> {
    let executor = ProcessExecutor::from_config(config);
    let mut reporter = ConsoleReporter::stdout(config.palette, verbose);

    match SnapshotRunner::new(config, &executor, &mut reporter).run_one(name)? {
        Some(outcome) if outcome.matches() => Ok(ExitCode::SUCCESS),
        _ => Err(CliError::reported()),
    }
}

/// Overwrite every snapshot. Always succeeds unless the runner's own I/O fails.
pub fn regenerate(config: &RunnerConfig) -> CliResult<ExitCode> {
    let executor = ProcessExecutor::from_config(config);
    let mut reporter = ConsoleReporter::stdout(config.palette, false);

    SnapshotRunner::new(config, &executor, &mut reporter).regenerate_all()?;
    Ok(ExitCode::SUCCESS)
}

/// Print usage and the available fixtures, then fail.
pub fn usage(config: &RunnerConfig, program: &str) -> CliResult<ExitCode> {
    let mut out = io::stdout().lock();
    write_usage(&mut out, config, program)
        .map_err(|e| CliError::failure(format!("Error writing usage: {e}")))?;
    Err(CliError::reported())
}

/// Render the usage text and the fixture list to `out`.
pub fn write_usage<W: Write>(out: &mut W, config: &RunnerConfig, program: &str) -> io::Result<()> {
    writeln!(out, "Usage: {program} [test|regenerate|regen|test-<fixture_name>] [--ci] [-v]")?;
    writeln!(out)?;
    writeln!(out, "Commands:")?;
    writeln!(out, "  test                Test all fixtures (default)")?;
    writeln!(out, "  regenerate|regen    Regenerate all snapshots")?;
    writeln!(out, "  test-<name>         Test specific fixture (e.g., test-vars)")?;
    writeln!(out)?;
    writeln!(out, "Options:")?;
    writeln!(out, "  --ci                CI mode (summary wording only)")?;
    writeln!(out, "  -v, --verbose       Show detailed diff output")?;
    writeln!(out, "  --target <PATH>     Program under test [default: {}]", config.target.display())?;
    writeln!(out, "  --fixtures <DIR>    Fixture directory [default: {}]", config.fixtures_dir.display())?;
    writeln!(out, "  --snapshots <DIR>   Snapshot directory [default: {}]", config.snapshots_dir.display())?;
    writeln!(out, "  --timeout <SECS>    Per-fixture time limit [default: {}]", config.timeout.as_secs())?;
    writeln!(out, "  --no-color          Disable colored output")?;
    writeln!(out)?;
    writeln!(out, "Available fixtures:")?;

    // Listing is best-effort: an unreadable directory just lists nothing.
    let fixtures = discover_fixtures(&config.fixtures_dir).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "cannot list fixtures");
        Vec::new()
    });
    for fixture in fixtures {
        writeln!(out, "  - {}", fixture.name)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_usage_lists_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("vars.js"), "").unwrap();
        fs::write(dir.path().join("loops.js"), "").unwrap();
        let config = RunnerConfig::new().with_fixtures_dir(dir.path());

        let mut buf = Vec::new();
        write_usage(&mut buf, &config, "snaprun").unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Usage: snaprun [test|regenerate|regen|test-<fixture_name>] [--ci] [-v]\n"));
        assert!(text.ends_with("Available fixtures:\n  - loops\n  - vars\n"));
    }

    #[test]
    fn test_usage_without_fixture_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::new().with_fixtures_dir(dir.path().join("missing"));

        let mut buf = Vec::new();
        write_usage(&mut buf, &config, "snaprun").unwrap();
        assert!(String::from_utf8(buf).unwrap().ends_with("Available fixtures:\n"));
    }

    #[test]
    fn test_fixture_missing_fails_without_running_target() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunnerConfig::new()
            .with_target(dir.path().join("never-built"))
            .with_fixtures_dir(dir.path())
            .with_snapshots_dir(dir.path().join("snapshots"));

        let err = test_fixture(&config, "nonexistent", false).unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(err.message.is_empty());
        // Nothing ran, so nothing was written either
        assert!(!dir.path().join("snapshots").exists());
    }
}
