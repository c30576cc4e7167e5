//! Aggregate counters for a full run.

use crate::compare::StatusChange;

/// Counts accumulated across every fixture of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTally {
    pub total: usize,
    pub matching: usize,
    pub differing: usize,
    pub newly_passing: usize,
    pub newly_failing: usize,
}

impl RunTally {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// Fold one fixture outcome into the tally.
    pub fn record(&mut self, matches: bool, change: Option<StatusChange>) {
        if matches {
            self.matching += 1;
        } else {
            self.differing += 1;
        }
        match change {
            Some(StatusChange::NowPassing) => self.newly_passing += 1,
            Some(StatusChange::NowFailing) => self.newly_failing += 1,
            None => {}
        }
    }

    /// A run succeeds iff no snapshot differs. Status flips are informational only.
    pub fn is_success(&self) -> bool {
        self.differing == 0
    }
}
