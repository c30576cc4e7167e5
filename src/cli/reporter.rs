//! Console reporting for snapshot runs
//!
//! ## SnapshotReporter Trait
//!
//! Orchestration in `test_runner` only emits events; how they are rendered is up to the reporter. The default
//! [`ConsoleReporter`] prints colored, human-readable lines to any `io::Write` sink (stdout in the CLI, a buffer in
//! tests).

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use snaprun_core::{Difference, ResultRecord, RunTally, StatusChange};

use super::RunnerError;
use super::config::Palette;

/// How the final summary should be worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryMode {
    #[default]
    Normal,
    Ci,
}

/// A snapshot that no longer matches a fresh run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub expected: ResultRecord,
    pub actual: ResultRecord,
    pub diffs: Vec<Difference>,
    pub change: Option<StatusChange>,
}

/// Trait for reporting snapshot run events.
///
/// Implement this trait to customize output (JSON, TAP, etc.).
pub trait SnapshotReporter {
    /// Called before a missing snapshot is written
    fn on_snapshot_generating(&mut self, fixture: &str);

    /// Called after a missing snapshot was written from `record`
    fn on_snapshot_generated(&mut self, fixture: &str, record: &ResultRecord);

    /// Called when a fresh run matches its snapshot
    fn on_snapshot_matched(&mut self, fixture: &str);

    /// Called when a fresh run differs from its snapshot
    fn on_snapshot_differs(&mut self, fixture: &str, mismatch: &Mismatch);

    /// Called when the runner itself failed on a fixture; the run carries on with the next one
    fn on_fixture_error(&mut self, fixture: &str, error: &RunnerError);

    /// Called when a single requested fixture does not exist
    fn on_fixture_missing(&mut self, path: &Path);

    /// Called once all fixtures of a `test` run have been processed
    fn on_run_complete(&mut self, tally: &RunTally, mode: SummaryMode);

    /// Called when regeneration begins
    fn on_regenerate_start(&mut self) {}

    /// Called before each snapshot is regenerated
    fn on_regenerating(&mut self, _fixture: &str) {}

    /// Called when every snapshot has been regenerated
    fn on_regenerate_complete(&mut self, passing: usize, failing: usize);
}

/// Default console reporter.
pub struct ConsoleReporter<W: Write> {
    out: W,
    palette: Palette,
    verbose: bool,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout(palette: Palette, verbose: bool) -> Self {
        Self::new(io::stdout(), palette, verbose)
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, palette: Palette, verbose: bool) -> Self {
        Self { out, palette, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, args: fmt::Arguments<'_>) {
        // A closed stdout leaves nobody to report to.
        if let Err(e) = writeln!(self.out, "{args}") {
            tracing::debug!(error = %e, "failed to write report line");
        }
    }

    fn print_stream_diff(&mut self, label: &str, expected: &str, actual: &str) {
        self.line(format_args!("Expected {label}:"));
        self.line(format_args!("{expected}"));
        self.line(format_args!("Actual {label}:"));
        self.line(format_args!("{actual}"));
    }
}

impl<W: Write> SnapshotReporter for ConsoleReporter<W> {
    fn on_snapshot_generating(&mut self, fixture: &str) {
        let p = self.palette;
        self.line(format_args!("{}Generating missing snapshot for {fixture}...{}", p.yellow, p.reset));
    }

    fn on_snapshot_generated(&mut self, fixture: &str, record: &ResultRecord) {
        let p = self.palette;
        let (icon, color) = if record.passed() { ("✓", p.green) } else { ("✗", p.red) };
        self.line(format_args!(
            "{color}{icon} Generated snapshot for {fixture} ({}){}",
            record.status, p.reset
        ));
    }

    fn on_snapshot_matched(&mut self, fixture: &str) {
        let p = self.palette;
        self.line(format_args!("{}✓ Test passed: {fixture}{}", p.green, p.reset));
    }

    fn on_snapshot_differs(&mut self, fixture: &str, mismatch: &Mismatch) {
        let p = self.palette;
        let change = match mismatch.change {
            Some(StatusChange::NowPassing) => format!(" {}(now passing!){}", p.cyan, p.reset),
            Some(StatusChange::NowFailing) => format!(" {}(now failing!){}", p.yellow, p.reset),
            None => String::new(),
        };
        self.line(format_args!("{}✗ Snapshot differs: {fixture}{change}{}", p.red, p.reset));

        if !self.verbose {
            return;
        }
        for diff in &mismatch.diffs {
            self.line(format_args!("  {diff}"));
        }
        if mismatch.diffs.contains(&Difference::Stdout) {
            self.print_stream_diff("stdout", &mismatch.expected.stdout, &mismatch.actual.stdout);
        }
        if mismatch.diffs.contains(&Difference::Stderr) {
            self.print_stream_diff("stderr", &mismatch.expected.stderr, &mismatch.actual.stderr);
        }
        self.line(format_args!("---"));
    }

    fn on_fixture_error(&mut self, fixture: &str, error: &RunnerError) {
        let p = self.palette;
        self.line(format_args!("{}✗ Error testing {fixture}: {error}{}", p.red, p.reset));
    }

    fn on_fixture_missing(&mut self, path: &Path) {
        let p = self.palette;
        self.line(format_args!("{}Error: Fixture {} not found{}", p.red, path.display(), p.reset));
    }

    fn on_run_complete(&mut self, tally: &RunTally, mode: SummaryMode) {
        let p = self.palette;
        self.line(format_args!("---"));
        self.line(format_args!(
            "Results: {} snapshots match, {} differ",
            tally.matching, tally.differing
        ));

        if tally.newly_passing > 0 {
            self.line(format_args!("{}🎉 {} test(s) now passing!{}", p.green, tally.newly_passing, p.reset));
        }
        if tally.newly_failing > 0 {
            self.line(format_args!("{}💥 {} test(s) now failing!{}", p.red, tally.newly_failing, p.reset));
        }

        match (mode, tally.is_success()) {
            (SummaryMode::Ci, true) => {
                self.line(format_args!("{}CI: Passing (all snapshots match){}", p.cyan, p.reset));
            }
            (SummaryMode::Ci, false) => {
                self.line(format_args!("{}CI: Failing (snapshots differ from expected){}", p.red, p.reset));
            }
            (SummaryMode::Normal, true) => {}
            (SummaryMode::Normal, false) => {
                self.line(format_args!(
                    "{}Note: Run 'snaprun regen' to update snapshots if changes are intentional{}",
                    p.yellow, p.reset
                ));
            }
        }
    }

    fn on_regenerate_start(&mut self) {
        self.line(format_args!("Regenerating all snapshots..."));
    }

    fn on_regenerating(&mut self, fixture: &str) {
        self.line(format_args!("Regenerating snapshot for {fixture}..."));
    }

    fn on_regenerate_complete(&mut self, passing: usize, failing: usize) {
        let p = self.palette;
        self.line(format_args!(
            "{}All snapshots regenerated: {passing} passing, {failing} failing{}",
            p.green, p.reset
        ));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn plain(verbose: bool) -> ConsoleReporter<Vec<u8>> {
        ConsoleReporter::new(Vec::new(), Palette::plain(), verbose)
    }

    fn output(reporter: ConsoleReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn mismatch(expected: ResultRecord, actual: ResultRecord) -> Mismatch {
        Mismatch {
            diffs: snaprun_core::compare(&expected, &actual),
            change: StatusChange::between(&expected, &actual),
            expected,
            actual,
        }
    }

    #[test]
    fn test_generated_lines() {
        let mut r = plain(false);
        r.on_snapshot_generating("a.js");
        r.on_snapshot_generated("a.js", &ResultRecord::from_exit(0, "ok", ""));
        r.on_snapshot_generated("b.js", &ResultRecord::from_exit(1, "", "err"));
        assert_eq!(
            output(r),
            "Generating missing snapshot for a.js...\n\
             ✓ Generated snapshot for a.js (pass)\n\
             ✗ Generated snapshot for b.js (fail)\n"
        );
    }

    #[test]
    fn test_differs_with_status_change_indicator() {
        let mut r = plain(false);
        r.on_snapshot_differs(
            "a.js",
            &mismatch(ResultRecord::from_exit(1, "", ""), ResultRecord::from_exit(0, "", "")),
        );
        r.on_snapshot_differs(
            "b.js",
            &mismatch(ResultRecord::from_exit(0, "", ""), ResultRecord::from_exit(2, "", "")),
        );
        assert_eq!(
            output(r),
            "✗ Snapshot differs: a.js (now passing!)\n✗ Snapshot differs: b.js (now failing!)\n"
        );
    }

    #[test]
    fn test_non_verbose_hides_details() {
        let mut r = plain(false);
        r.on_snapshot_differs(
            "a.js",
            &mismatch(ResultRecord::from_exit(0, "old", ""), ResultRecord::from_exit(0, "new", "")),
        );
        assert_eq!(output(r), "✗ Snapshot differs: a.js\n");
    }

    #[test]
    fn test_verbose_prints_stream_contents() {
        let mut r = plain(true);
        r.on_snapshot_differs(
            "a.js",
            &mismatch(ResultRecord::from_exit(0, "old", ""), ResultRecord::from_exit(0, "new", "")),
        );
        assert_eq!(
            output(r),
            "✗ Snapshot differs: a.js\n  Stdout differs\nExpected stdout:\nold\nActual stdout:\nnew\n---\n"
        );
    }

    #[test]
    fn test_fixture_error_line() {
        let mut r = plain(true);
        let error = RunnerError::ReadSnapshot {
            path: "snapshots/a.js.snap".into(),
            source: io::Error::other("is a directory"),
        };
        r.on_fixture_error("a.js", &error);
        assert_eq!(
            output(r),
            "✗ Error testing a.js: cannot read snapshot snapshots/a.js.snap: is a directory\n"
        );
    }

    #[test]
    fn test_ci_summary_wording() {
        let mut r = plain(false);
        r.on_run_complete(&RunTally::new(0), SummaryMode::Ci);
        let mut failing = RunTally::new(1);
        failing.record(false, None);
        r.on_run_complete(&failing, SummaryMode::Ci);

        let out = output(r);
        assert!(out.contains("CI: Passing (all snapshots match)"));
        assert!(out.contains("CI: Failing (snapshots differ from expected)"));
        assert!(!out.contains("Note:"));
    }

    #[test]
    fn test_normal_summary_note_only_on_failure() {
        let mut r = plain(false);
        r.on_run_complete(&RunTally::new(0), SummaryMode::Normal);
        assert!(!output(r).contains("Note:"));

        let mut r = plain(false);
        let mut failing = RunTally::new(1);
        failing.record(false, Some(StatusChange::NowFailing));
        r.on_run_complete(&failing, SummaryMode::Normal);
        let out = output(r);
        assert!(out.contains("💥 1 test(s) now failing!"));
        assert!(out.contains("Note: Run 'snaprun regen'"));
    }

    #[test]
    fn test_ansi_palette_wraps_lines() {
        let mut r = ConsoleReporter::new(Vec::new(), Palette::ansi(), false);
        r.on_snapshot_matched("a.js");
        assert_eq!(output(r), "\x1b[0;32m✓ Test passed: a.js\x1b[0m\n");
    }
}
