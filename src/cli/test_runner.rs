//! Snapshot test orchestration
//!
//! Per fixture the flow is always Execute → Snapshot I/O → Compare → Report:
//!
//! - no snapshot yet: the fresh result becomes the snapshot and the fixture counts as matching;
//! - snapshot present: the fresh result is compared field by field and reported as matching or differing.
//!
//! Fixtures run one at a time, in file-name order. Neither a differing snapshot nor a snapshot the runner cannot read
//! or write stops a full run: the latter is reported and counted as differing. Only failing to list fixtures or to
//! create the snapshots directory (see [`RunnerError`]) aborts it.
//!
//! ## I/O Boundaries
//!
//! Running the target goes through [`ProgramExecutor`] and output goes through [`SnapshotReporter`], so the same
//! orchestration serves the CLI and in-memory tests.

use snaprun_core::{ResultRecord, RunTally, StatusChange, compare};

use super::RunnerError;
use super::config::RunnerConfig;
use super::executor::ProgramExecutor;
use super::reporter::{Mismatch, SnapshotReporter, SummaryMode};
use super::snapshot::{Fixture, discover_fixtures, ensure_snapshot_dir, load_snapshot, save_snapshot};

/// What happened to one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureOutcome {
    /// No snapshot existed; one was written from this result.
    Generated(ResultRecord),
    /// The fresh result equals the snapshot.
    Matched,
    /// The fresh result differs from the snapshot.
    Differs(Mismatch),
}

impl FixtureOutcome {
    /// Whether this fixture counts as matching its snapshot. Freshly generated snapshots always match.
    pub fn matches(&self) -> bool {
        !matches!(self, FixtureOutcome::Differs(_))
    }

    pub fn status_change(&self) -> Option<StatusChange> {
        match self {
            FixtureOutcome::Differs(mismatch) => mismatch.change,
            _ => None,
        }
    }
}

/// Totals of a regeneration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegenerateSummary {
    pub passing: usize,
    pub failing: usize,
}

/// Drives fixtures through an executor and reports through a reporter.
pub struct SnapshotRunner<'a> {
    config: &'a RunnerConfig,
    executor: &'a dyn ProgramExecutor,
    reporter: &'a mut dyn SnapshotReporter,
}

impl<'a> SnapshotRunner<'a> {
    pub fn new(
        config: &'a RunnerConfig,
        executor: &'a dyn ProgramExecutor,
        reporter: &'a mut dyn SnapshotReporter,
    ) -> Self {
        Self {
            config,
            executor,
            reporter,
        }
    }

    /// Run one fixture against its snapshot, generating the snapshot if it is missing.
    #[tracing::instrument(skip_all, fields(fixture = %fixture.name))]
    pub fn run_fixture(&mut self, fixture: &Fixture) -> Result<FixtureOutcome, RunnerError> {
        let display_name = fixture.display_name();
        let snapshot_path = fixture.snapshot_path(&self.config.snapshots_dir);

        let actual: ResultRecord = self.executor.execute(&fixture.path).into();

        let Some(expected) = load_snapshot(&snapshot_path)? else {
            self.reporter.on_snapshot_generating(&display_name);
            save_snapshot(&snapshot_path, &actual)?;
            self.reporter.on_snapshot_generated(&display_name, &actual);
            return Ok(FixtureOutcome::Generated(actual));
        };

        let diffs = compare(&expected, &actual);
        if diffs.is_empty() {
            self.reporter.on_snapshot_matched(&display_name);
            return Ok(FixtureOutcome::Matched);
        }

        tracing::debug!(diff_count = diffs.len(), "snapshot differs");
        let mismatch = Mismatch {
            change: StatusChange::between(&expected, &actual),
            expected,
            actual,
            diffs,
        };
        self.reporter.on_snapshot_differs(&display_name, &mismatch);
        Ok(FixtureOutcome::Differs(mismatch))
    }

    /// Run every fixture and report the aggregate. The run succeeds iff `tally.is_success()`.
    pub fn run_all(&mut self, mode: SummaryMode) -> Result<RunTally, RunnerError> {
        ensure_snapshot_dir(&self.config.snapshots_dir)?;
        let fixtures = discover_fixtures(&self.config.fixtures_dir)?;
        tracing::debug!(count = fixtures.len(), "collected fixtures");

        let mut tally = RunTally::new(fixtures.len());
        for fixture in &fixtures {
            match self.run_fixture(fixture) {
                Ok(outcome) => tally.record(outcome.matches(), outcome.status_change()),
                Err(e) => {
                    tracing::warn!(fixture = %fixture.name, error = %e, "fixture aborted");
                    self.reporter.on_fixture_error(&fixture.display_name(), &e);
                    tally.record(false, None);
                }
            }
        }

        self.reporter.on_run_complete(&tally, mode);
        Ok(tally)
    }

    /// Run the fixture called `name`. Returns `None`, without executing anything, if it does not exist.
    pub fn run_one(&mut self, name: &str) -> Result<Option<FixtureOutcome>, RunnerError> {
        let fixture = Fixture::named(&self.config.fixtures_dir, name);
        if !fixture.path.is_file() {
            self.reporter.on_fixture_missing(&fixture.path);
            return Ok(None);
        }

        ensure_snapshot_dir(&self.config.snapshots_dir)?;
        self.run_fixture(&fixture).map(Some)
    }

    /// Overwrite every snapshot with a fresh result.
    pub fn regenerate_all(&mut self) -> Result<RegenerateSummary, RunnerError> {
        ensure_snapshot_dir(&self.config.snapshots_dir)?;
        self.reporter.on_regenerate_start();

        let mut summary = RegenerateSummary::default();
        for fixture in discover_fixtures(&self.config.fixtures_dir)? {
            self.reporter.on_regenerating(&fixture.display_name());
            let record: ResultRecord = self.executor.execute(&fixture.path).into();
            save_snapshot(&fixture.snapshot_path(&self.config.snapshots_dir), &record)?;

            if record.passed() {
                summary.passing += 1;
            } else {
                summary.failing += 1;
            }
        }

        self.reporter.on_regenerate_complete(summary.passing, summary.failing);
        Ok(summary)
    }
}
