//! Harness configuration
//!
//! Everything the harness needs to know about its environment lives in
//! [`HarnessConfig`], which is loaded once and passed down explicitly. The
//! optional config file is TOML; every field has a default and CLI flags
//! override what the file says.
//!
//! ```toml
//! daemon_path = "../src/belayd"
//! tests_dir = "ftests"
//! log_level = 8
//! skip_list = [3, "007-effect-log"]
//! ```

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LOG_FILE: &str = "belayd-ftests.log";
pub const DEFAULT_DAEMON_PATH: &str = "src/belayd";
pub const DEFAULT_TESTS_DIR: &str = "ftests";

pub const LOG_CRITICAL: u8 = 1;
pub const LOG_WARNING: u8 = 5;
pub const LOG_DEBUG: u8 = 8;
pub const DEFAULT_LOG_LEVEL: u8 = LOG_WARNING;

/// Suite name that selects every suite
pub const ALL_SUITES: &str = "allsuites";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// The belayd binary under test
    pub daemon_path: PathBuf,
    /// Directory holding config templates; the daemon runs from here
    pub tests_dir: PathBuf,
    pub log_file: PathBuf,
    /// Harness log verbosity, 1 (critical) to 8 (debug)
    pub log_level: u8,
    /// Suite to run; `None` runs every suite
    pub suite: Option<String>,
    /// Test number to run; `None` runs every test
    pub num: Option<u32>,
    /// Tests that are never run, by number or `NNN-name` identifier
    pub skip_list: Vec<SkipEntry>,
    /// Mirror the log to stderr
    pub verbose: bool,
    /// Tolerate profiling noise on the daemon's stderr
    pub ignore_profiling_errors: bool,
    /// Deadline for each daemon run, in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            daemon_path: PathBuf::from(DEFAULT_DAEMON_PATH),
            tests_dir: PathBuf::from(DEFAULT_TESTS_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_level: DEFAULT_LOG_LEVEL,
            suite: None,
            num: None,
            skip_list: Vec::new(),
            verbose: false,
            ignore_profiling_errors: true,
            timeout_secs: None,
        }
    }
}

impl HarnessConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Whether `suite` is selected
    pub fn runs_suite(&self, suite: &str) -> bool {
        match self.suite.as_deref() {
            None | Some(ALL_SUITES) => true,
            Some(selected) => selected == suite,
        }
    }

    /// Whether test `num` is selected by number
    pub fn runs_num(&self, num: u32) -> bool {
        self.num.is_none_or(|selected| selected == num)
    }

    /// Whether the test numbered `num` with identifier `id` is in the skip list
    pub fn skips(&self, num: u32, id: &str) -> bool {
        self.skip_list.iter().any(|entry| entry.matches(num, id))
    }
}

/// One skip list entry: a test number or a full `NNN-name` identifier
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SkipEntry {
    Number(u32),
    Id(String),
}

impl SkipEntry {
    /// An identifier made only of digits is compared as a number, so `"001"`
    /// skips test 1
    pub fn matches(&self, num: u32, id: &str) -> bool {
        match self {
            Self::Number(n) => *n == num,
            Self::Id(entry) => entry == id || entry.parse::<u32>().is_ok_and(|n| n == num),
        }
    }
}

impl FromStr for SkipEntry {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse() {
            Ok(num) => Self::Number(num),
            Err(_) => Self::Id(s.to_string()),
        })
    }
}

impl fmt::Display for SkipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{num}"),
            Self::Id(id) => f.write_str(id),
        }
    }
}

/// Indent every line of `text` by `count` spaces
pub fn indent(text: &str, count: usize) -> String {
    let pad = " ".repeat(count);
    text.split_inclusive('\n')
        .map(|line| format!("{pad}{line}"))
        .collect()
}

impl fmt::Display for HarnessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip: Vec<String> = self.skip_list.iter().map(SkipEntry::to_string).collect();
        let body = format!(
            "daemon_path = {}\ntests_dir = {}\nsuite = {}\nnum = {}\nskip_list = {}\n",
            self.daemon_path.display(),
            self.tests_dir.display(),
            self.suite.as_deref().unwrap_or(ALL_SUITES),
            self.num.map_or_else(|| "all".to_string(), |n| n.to_string()),
            skip.join(","),
        );
        write!(f, "Configuration\n{}", indent(&body, 4))
    }
}
