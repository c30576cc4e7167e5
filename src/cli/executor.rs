//! Execution of the target program against one fixture
//!
//! Running the target sits behind the [`ProgramExecutor`] trait so the orchestration in `test_runner` can be
//! driven by something other than a real process (dry runs, tests).
//!
//! The outcome is an explicit [`Execution`] value. Target misbehavior (timeouts, missing executable) never
//! surfaces as an error: every kind of outcome converts into a [`ResultRecord`].

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use snaprun_core::{LAUNCH_FAILURE_EXIT_CODE, ResultRecord};

use super::config::RunnerConfig;

/// Interval between `try_wait` polls while the child is running.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How one invocation of the target ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Execution {
    /// The process exited on its own.
    Completed { exit_code: i32, stdout: String, stderr: String },
    /// The process outlived its budget and was killed.
    TimedOut { after: Duration },
    /// The process could not be started or waited on.
    LaunchFailed(String),
}

impl From<Execution> for ResultRecord {
    fn from(execution: Execution) -> Self {
        match execution {
            Execution::Completed {
                exit_code,
                stdout,
                stderr,
            } => ResultRecord::from_exit(exit_code, stdout, stderr),
            Execution::TimedOut { after } => ResultRecord::timed_out(after),
            Execution::LaunchFailed(description) => ResultRecord::launch_failed(description),
        }
    }
}

/// Run the program under test against a fixture.
pub trait ProgramExecutor {
    /// Invoke the target with `fixture` as its sole argument. Single attempt, no retries.
    fn execute(&self, fixture: &Path) -> Execution;
}

/// Spawns the target as a child process with a wall-clock timeout (default implementation).
#[derive(Debug, Clone)]
pub struct ProcessExecutor {
    target: PathBuf,
    timeout: Duration,
}

impl ProcessExecutor {
    pub fn new(target: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            target: target.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(&config.target, config.timeout)
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timed_out(&self) -> Execution {
        // Readers are detached: a grandchild may still hold the pipes open.
        tracing::warn!(timeout_secs = self.timeout.as_secs(), "target timed out");
        Execution::TimedOut { after: self.timeout }
    }
}

impl ProgramExecutor for ProcessExecutor {
    #[tracing::instrument(skip_all, fields(target = %self.target.display(), fixture = %fixture.display()))]
    fn execute(&self, fixture: &Path) -> Execution {
        let started = Instant::now();
        // `None` when the timeout is too large to represent: no deadline at all.
        let deadline = started.checked_add(self.timeout);

        let mut child = match Command::new(&self.target)
            .arg(fixture)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(error = %e, "failed to launch target");
                return Execution::LaunchFailed(e.to_string());
            }
        };

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = match wait_with_deadline(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => return self.timed_out(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to wait for target");
                return Execution::LaunchFailed(e.to_string());
            }
        };

        // A background process started by the target can keep the pipes open after the target exits, so the
        // output is collected against the same deadline.
        let (Some(stdout), Some(stderr)) = (
            collect_output(stdout_reader, deadline),
            collect_output(stderr_reader, deadline),
        ) else {
            return self.timed_out();
        };

        let exit_code = exit_code_of(status);
        tracing::debug!(exit_code, elapsed_ms = started.elapsed().as_millis() as u64, "target exited");
        Execution::Completed {
            exit_code,
            stdout,
            stderr,
        }
    }
}

/// Wait for `child` until `deadline` passes. A `None` deadline waits indefinitely.
///
/// Returns `Ok(None)` when the deadline passed; the child has then been killed and reaped.
fn wait_with_deadline(child: &mut Child, deadline: Option<Instant>) -> io::Result<Option<ExitStatus>> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(Some(status)),
            Ok(None) => {}
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            let _ = child.kill();
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Read `pipe` to its end on a separate thread; the bytes arrive on the returned channel.
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Vec<u8>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = pipe.read_to_end(&mut buf) {
            tracing::debug!(error = %e, "failed to read target output");
        }
        // The receiver is gone once the run has timed out.
        let _ = tx.send(buf);
    });
    rx
}

/// Collect a reader's bytes as text, or `None` if `deadline` passes first.
///
/// A missing stream or a reader that died becomes empty text.
fn collect_output(reader: Option<Receiver<Vec<u8>>>, deadline: Option<Instant>) -> Option<String> {
    let Some(rx) = reader else {
        return Some(String::new());
    };
    let received = match deadline {
        Some(d) => rx.recv_timeout(d.saturating_duration_since(Instant::now())),
        None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
    };
    let bytes = match received {
        Ok(bytes) => bytes,
        Err(RecvTimeoutError::Disconnected) => Vec::new(),
        Err(RecvTimeoutError::Timeout) => return None,
    };
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Map an exit status to a single integer, reporting signal deaths as `-<signal>`.
fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt as _;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    LAUNCH_FAILURE_EXIT_CODE
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use snaprun_core::Status;

    #[test]
    fn test_completed_converts_with_derived_status() {
        let record: ResultRecord = Execution::Completed {
            exit_code: 0,
            stdout: "ok".into(),
            stderr: String::new(),
        }
        .into();
        assert_eq!(record, ResultRecord::from_exit(0, "ok", ""));
        assert_eq!(record.status, Status::Pass);
    }

    #[test]
    fn test_timed_out_converts_to_124() {
        let record: ResultRecord = Execution::TimedOut {
            after: Duration::from_secs(10),
        }
        .into();
        assert_eq!(record.exit_code, 124);
        assert_eq!(record.stderr, "Test timed out after 10 seconds");
        assert_eq!(record.status, Status::Fail);
    }

    #[test]
    fn test_launch_failure_converts_to_exit_1() {
        let record: ResultRecord = Execution::LaunchFailed("permission denied".into()).into();
        assert_eq!(record.exit_code, 1);
        assert_eq!(record.stderr, "Error running test: permission denied");
    }

    #[test]
    fn test_missing_target_is_launch_failure() {
        let executor = ProcessExecutor::new("/nonexistent/snaprun-target", Duration::from_secs(1));
        let execution = executor.execute(Path::new("a.js"));
        assert!(matches!(execution, Execution::LaunchFailed(_)), "got {execution:?}");
    }

    #[cfg(unix)]
    #[test]
    fn test_unrepresentable_timeout_means_no_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let fixture = dir.path().join("ok.js");
        std::fs::write(&fixture, "printf ok\n").unwrap();

        let executor = ProcessExecutor::new("/bin/sh", Duration::from_secs(u64::MAX));
        let record: ResultRecord = executor.execute(&fixture).into();

        assert_eq!(record, ResultRecord::from_exit(0, "ok", ""));
    }

    #[test]
    fn test_collect_output_times_out_on_open_pipe() {
        let (_tx, rx) = mpsc::channel::<Vec<u8>>();
        let deadline = Instant::now().checked_add(Duration::from_millis(20));
        assert_eq!(collect_output(Some(rx), deadline), None);
    }

    #[test]
    fn test_collect_output_decodes_lossily_and_tolerates_dead_reader() {
        let (tx, rx) = mpsc::channel();
        tx.send(b"a\xffb".to_vec()).unwrap();
        assert_eq!(collect_output(Some(rx), None).as_deref(), Some("a\u{FFFD}b"));

        let (tx, rx) = mpsc::channel::<Vec<u8>>();
        drop(tx);
        assert_eq!(collect_output(Some(rx), None).as_deref(), Some(""));
        assert_eq!(collect_output(None, None).as_deref(), Some(""));
    }

    #[test]
    fn test_from_config_uses_target_and_timeout() {
        let config = RunnerConfig::new()
            .with_target("bin/prog")
            .with_timeout(Duration::from_secs(2));
        let executor = ProcessExecutor::from_config(&config);
        assert_eq!(executor.target(), Path::new("bin/prog"));
        assert_eq!(executor.timeout(), Duration::from_secs(2));
    }
}
