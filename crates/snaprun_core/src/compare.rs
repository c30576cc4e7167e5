//! Structural comparison between an expected and an actual [`ResultRecord`].
//!
//! Only `exit_code`, `stdout` and `stderr` take part in matching. `status` is compared separately, and only to
//! classify a mismatch as newly passing or newly failing.

use std::fmt;

use crate::record::{ResultRecord, Status};

/// One named field that differs between two records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difference {
    ExitCode { expected: i32, actual: i32 },
    Stdout,
    Stderr,
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::ExitCode { expected, actual } => {
                write!(f, "Exit code: expected {expected}, got {actual}")
            }
            Difference::Stdout => f.write_str("Stdout differs"),
            Difference::Stderr => f.write_str("Stderr differs"),
        }
    }
}

/// List the differences between `expected` and `actual`, in the order exit code, stdout, stderr.
///
/// An empty list means the records match.
pub fn compare(expected: &ResultRecord, actual: &ResultRecord) -> Vec<Difference> {
    let mut diffs = Vec::new();

    if expected.exit_code != actual.exit_code {
        diffs.push(Difference::ExitCode {
            expected: expected.exit_code,
            actual: actual.exit_code,
        });
    }
    if expected.stdout != actual.stdout {
        diffs.push(Difference::Stdout);
    }
    if expected.stderr != actual.stderr {
        diffs.push(Difference::Stderr);
    }

    diffs
}

/// Direction of a pass/fail flip between a snapshot and a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    NowPassing,
    NowFailing,
}

impl StatusChange {
    /// Classify the flip, if any, from `expected` to `actual`.
    pub fn between(expected: &ResultRecord, actual: &ResultRecord) -> Option<Self> {
        if expected.status == actual.status {
            return None;
        }
        Some(match actual.status {
            Status::Pass => StatusChange::NowPassing,
            Status::Fail => StatusChange::NowFailing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(exit_code: i32, stdout: &str, stderr: &str) -> ResultRecord {
        ResultRecord::from_exit(exit_code, stdout, stderr)
    }

    #[test]
    fn test_identical_records_match() {
        let a = rec(0, "ok\n", "");
        assert!(compare(&a, &a.clone()).is_empty());
    }

    #[test]
    fn test_all_fields_differ_in_fixed_order() {
        let diffs = compare(&rec(0, "a", "x"), &rec(3, "b", "y"));
        assert_eq!(
            diffs,
            vec![
                Difference::ExitCode { expected: 0, actual: 3 },
                Difference::Stdout,
                Difference::Stderr,
            ]
        );
    }

    #[test]
    fn test_only_stderr_differs() {
        let diffs = compare(&rec(1, "same", "old"), &rec(1, "same", "new"));
        assert_eq!(diffs, vec![Difference::Stderr]);
    }

    #[test]
    fn test_status_is_not_compared() {
        let mut legacy_empty = ResultRecord::from_legacy_stdout("");
        assert_eq!(legacy_empty.status, Status::Fail);
        let fresh = rec(0, "", "");
        assert!(compare(&legacy_empty, &fresh).is_empty());

        legacy_empty.status = Status::Pass;
        assert!(compare(&legacy_empty, &fresh).is_empty());
    }

    #[test]
    fn test_difference_display() {
        assert_eq!(
            Difference::ExitCode { expected: 0, actual: 124 }.to_string(),
            "Exit code: expected 0, got 124"
        );
        assert_eq!(Difference::Stdout.to_string(), "Stdout differs");
        assert_eq!(Difference::Stderr.to_string(), "Stderr differs");
    }

    #[test]
    fn test_status_change_classification() {
        let pass = rec(0, "", "");
        let fail = rec(1, "", "");
        assert_eq!(StatusChange::between(&fail, &pass), Some(StatusChange::NowPassing));
        assert_eq!(StatusChange::between(&pass, &fail), Some(StatusChange::NowFailing));
        assert_eq!(StatusChange::between(&pass, &pass), None);
        assert_eq!(StatusChange::between(&fail, &rec(2, "", "")), None);
    }
}
