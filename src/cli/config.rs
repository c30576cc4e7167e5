//! Runner configuration
//!
//! Paths, timeout and console colors are plain values handed to the runner and reporter. Nothing here is global.
//!
//! Precedence for each path is: command-line flag, then environment variable, then the default below. The CLI layer
//! resolves flags and environment (see `Cli`); this module only owns the defaults and the builder.

use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the program under test.
pub const DEFAULT_TARGET: &str = "build/main";
/// Default directory scanned for `*.js` fixtures.
pub const DEFAULT_FIXTURES_DIR: &str = "examples";
/// Default directory holding `<stem>.js.snap` files.
pub const DEFAULT_SNAPSHOTS_DIR: &str = "snapshots";
/// Default wall-clock budget per fixture, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Extension (without dot) a file needs to be picked up as a fixture.
pub const FIXTURE_EXTENSION: &str = "js";
/// Suffix appended to `<stem>.js` to name its snapshot file.
pub const SNAPSHOT_SUFFIX: &str = ".snap";

/// ANSI escape sequences used by the console reporter.
///
/// The plain palette renders every color as the empty string, which keeps output identical apart from the escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub green: &'static str,
    pub red: &'static str,
    pub yellow: &'static str,
    pub cyan: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub const fn ansi() -> Self {
        Self {
            green: "\x1b[0;32m",
            red: "\x1b[0;31m",
            yellow: "\x1b[1;33m",
            cyan: "\x1b[0;36m",
            reset: "\x1b[0m",
        }
    }

    pub const fn plain() -> Self {
        Self {
            green: "",
            red: "",
            yellow: "",
            cyan: "",
            reset: "",
        }
    }

    /// Pick a palette from the `--no-color` flag and the value of `NO_COLOR`.
    ///
    /// Any non-empty `NO_COLOR` disables colors, following <https://no-color.org>.
    pub fn select(no_color_flag: bool, no_color_env: Option<&OsStr>) -> Self {
        let env_disables = no_color_env.is_some_and(|v| !v.is_empty());
        if no_color_flag || env_disables {
            Self::plain()
        } else {
            Self::ansi()
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::ansi()
    }
}

/// Where the runner finds its target, fixtures and snapshots, and how long it waits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Executable invoked as `<target> <fixture-path>`
    pub target: PathBuf,
    /// Directory scanned (non-recursively) for fixtures
    pub fixtures_dir: PathBuf,
    /// Directory holding one snapshot per fixture
    pub snapshots_dir: PathBuf,
    /// Wall-clock budget for a single execution
    pub timeout: Duration,
    /// Console colors
    pub palette: Palette,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            target: PathBuf::from(DEFAULT_TARGET),
            fixtures_dir: PathBuf::from(DEFAULT_FIXTURES_DIR),
            snapshots_dir: PathBuf::from(DEFAULT_SNAPSHOTS_DIR),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            palette: Palette::ansi(),
        }
    }
}

impl RunnerConfig {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_fixtures_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixtures_dir = dir.into();
        self
    }

    pub fn with_snapshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.snapshots_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }
}
