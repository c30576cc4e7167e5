//! The result record captured from one execution of the target program.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exit code recorded when the target exceeds its wall-clock budget.
pub const TIMEOUT_EXIT_CODE: i32 = 124;

/// Exit code recorded when the target could not be launched or waited on.
pub const LAUNCH_FAILURE_EXIT_CODE: i32 = 1;

/// Pass/fail verdict of a single execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// Derive the verdict from a process exit code.
    pub fn from_exit_code(exit_code: i32) -> Self {
        if exit_code == 0 { Status::Pass } else { Status::Fail }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pass => "pass",
            Status::Fail => "fail",
        }
    }

    pub fn is_pass(self) -> bool {
        self == Status::Pass
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observable outcome of running the target against one fixture.
///
/// Field order matches the structured snapshot layout: `exit_code`, `stdout`, `stderr`, `status`.
///
/// Records built through [`ResultRecord::from_exit`] (and the timeout/launch-failure constructors) always carry a
/// `status` derived from `exit_code`. Records read back from disk keep whatever status was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResultRecord {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub status: Status,
}

impl ResultRecord {
    /// Build a record for a process that ran to completion.
    pub fn from_exit(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
            status: Status::from_exit_code(exit_code),
        }
    }

    /// Build the record for a run that was killed after `timeout`.
    pub fn timed_out(timeout: Duration) -> Self {
        Self::from_exit(
            TIMEOUT_EXIT_CODE,
            "",
            format!("Test timed out after {} seconds", timeout.as_secs()),
        )
    }

    /// Build the record for a target that could not be started (or waited on).
    pub fn launch_failed(description: impl fmt::Display) -> Self {
        Self::from_exit(LAUNCH_FAILURE_EXIT_CODE, "", format!("Error running test: {description}"))
    }

    /// Synthesize a record from a pre-JSON snapshot whose whole content was the expected stdout.
    ///
    /// Such snapshots never recorded an exit code, so it is assumed to be 0; an empty snapshot is treated as a
    /// failing one.
    pub fn from_legacy_stdout(content: impl Into<String>) -> Self {
        let stdout = content.into();
        let status = if stdout.is_empty() { Status::Fail } else { Status::Pass };
        Self {
            exit_code: 0,
            stdout,
            stderr: String::new(),
            status,
        }
    }

    pub fn passed(&self) -> bool {
        self.status.is_pass()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derived_from_exit_code() {
        assert_eq!(ResultRecord::from_exit(0, "ok", "").status, Status::Pass);
        assert_eq!(ResultRecord::from_exit(2, "", "boom").status, Status::Fail);
        assert_eq!(ResultRecord::from_exit(-9, "", "").status, Status::Fail);
    }

    #[test]
    fn test_timed_out_record() {
        let record = ResultRecord::timed_out(Duration::from_secs(10));
        assert_eq!(
            record,
            ResultRecord {
                exit_code: 124,
                stdout: String::new(),
                stderr: "Test timed out after 10 seconds".to_string(),
                status: Status::Fail,
            }
        );
    }

    #[test]
    fn test_launch_failed_record() {
        let record = ResultRecord::launch_failed("No such file or directory (os error 2)");
        assert_eq!(record.exit_code, 1);
        assert!(record.stdout.is_empty());
        assert_eq!(record.stderr, "Error running test: No such file or directory (os error 2)");
        assert_eq!(record.status, Status::Fail);
    }

    #[test]
    fn test_legacy_stdout_non_empty_passes() {
        let record = ResultRecord::from_legacy_stdout("hello\n");
        assert_eq!(record, ResultRecord::from_exit(0, "hello\n", ""));
    }

    #[test]
    fn test_legacy_stdout_empty_fails() {
        let record = ResultRecord::from_legacy_stdout("");
        assert_eq!(record.exit_code, 0);
        assert_eq!(record.status, Status::Fail);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Pass).unwrap(), "\"pass\"");
        assert_eq!(serde_json::to_string(&Status::Fail).unwrap(), "\"fail\"");
    }

    #[test]
    fn test_record_rejects_unknown_fields() {
        let json = r#"{"exit_code":0,"stdout":"","stderr":"","status":"pass","extra":1}"#;
        assert!(serde_json::from_str::<ResultRecord>(json).is_err());
    }
}
