//! Snapshot files and fixture discovery
//!
//! A snapshot is the JSON form of a [`ResultRecord`], pretty-printed with two-space indentation. Snapshots written
//! before the JSON format existed hold nothing but the expected stdout; those are still accepted and read as a
//! record with exit code 0.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use snaprun_core::ResultRecord;

use super::RunnerError;
use super::config::{FIXTURE_EXTENSION, SNAPSHOT_SUFFIX};

/// An input file driving one test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// File stem, e.g. `vars` for `examples/vars.js`
    pub name: String,
    pub path: PathBuf,
}

impl Fixture {
    /// Build a fixture from a path, if it carries the fixture extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        if path.extension().and_then(|e| e.to_str()) != Some(FIXTURE_EXTENSION) {
            return None;
        }
        let Some(name) = path.file_stem()?.to_str() else {
            tracing::warn!(path = %path.display(), "skipping fixture whose name is not valid UTF-8");
            return None;
        };
        Some(Self {
            name: name.to_string(),
            path,
        })
    }

    /// Locate the fixture called `name` inside `fixtures_dir` (it may not exist).
    pub fn named(fixtures_dir: &Path, name: &str) -> Self {
        Self {
            name: name.to_string(),
            path: fixtures_dir.join(format!("{name}.{FIXTURE_EXTENSION}")),
        }
    }

    /// Name as shown in reports, e.g. `vars.js`.
    pub fn display_name(&self) -> String {
        format!("{}.{FIXTURE_EXTENSION}", self.name)
    }

    /// Path of this fixture's snapshot inside `snapshots_dir`.
    pub fn snapshot_path(&self, snapshots_dir: &Path) -> PathBuf {
        snapshots_dir.join(format!("{}{SNAPSHOT_SUFFIX}", self.display_name()))
    }
}

/// List the fixtures directly inside `dir`, sorted by file name.
///
/// A missing directory yields no fixtures.
pub fn discover_fixtures(dir: &Path) -> Result<Vec<Fixture>, RunnerError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "fixtures directory does not exist");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(RunnerError::FixturesDir {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut fixtures = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RunnerError::FixturesDir {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(fixture) = Fixture::from_path(path) {
            fixtures.push(fixture);
        }
    }

    fixtures.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(fixtures)
}

/// Decode snapshot content, falling back to the legacy stdout-only format.
///
/// Never fails: anything that is not a structured record is legacy content.
pub fn decode_snapshot(content: &str) -> ResultRecord {
    match serde_json::from_str::<ResultRecord>(content) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "snapshot is not a structured record, reading as legacy stdout");
            ResultRecord::from_legacy_stdout(content)
        }
    }
}

/// Encode a record in the structured snapshot format.
pub fn encode_snapshot(record: &ResultRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(record)
}

/// Load the snapshot at `path`. `Ok(None)` means no snapshot has been recorded yet.
pub fn load_snapshot(path: &Path) -> Result<Option<ResultRecord>, RunnerError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RunnerError::ReadSnapshot {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Ok(Some(decode_snapshot(&String::from_utf8_lossy(&bytes))))
}

/// Write `record` to `path`, replacing any existing snapshot in full.
pub fn save_snapshot(path: &Path, record: &ResultRecord) -> Result<(), RunnerError> {
    let encoded = encode_snapshot(record).map_err(|source| RunnerError::EncodeSnapshot {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, encoded).map_err(|source| RunnerError::WriteSnapshot {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), status = %record.status, "snapshot written");
    Ok(())
}

/// Create the snapshots directory if it does not exist yet.
pub fn ensure_snapshot_dir(dir: &Path) -> Result<(), RunnerError> {
    fs::create_dir_all(dir).map_err(|source| RunnerError::SnapshotDir {
        path: dir.to_path_buf(),
        source,
    })
}
