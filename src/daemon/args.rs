//! Command-line flags for the belayd daemon

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters of one daemon run. Unset parameters omit their flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaemonArgs {
    /// Config file; a `.token` template is resolved before the run
    pub config: Option<PathBuf>,
    pub help: bool,
    /// Poll interval in seconds
    pub interval: Option<u32>,
    pub log_location: Option<PathBuf>,
    pub log_level: Option<u32>,
    /// Number of loops before the daemon exits
    pub max_loops: Option<u32>,
    /// Exit code that counts as success when the run fails
    pub expected_ret: Option<i32>,
    pub timeout: Option<Duration>,
}

impl DaemonArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, path: impl AsRef<Path>) -> Self {
        self.config = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn help(mut self) -> Self {
        self.help = true;
        self
    }

    pub fn interval(mut self, seconds: u32) -> Self {
        self.interval = Some(seconds);
        self
    }

    pub fn log_location(mut self, path: impl AsRef<Path>) -> Self {
        self.log_location = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn log_level(mut self, level: u32) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn max_loops(mut self, count: u32) -> Self {
        self.max_loops = Some(count);
        self
    }

    pub fn expected_ret(mut self, code: i32) -> Self {
        self.expected_ret = Some(code);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Daemon flags in their fixed order: config, help, interval, log
    /// location, log level, max loops.
    ///
    /// `config` is the path handed to `-c`, which differs from
    /// [`DaemonArgs::config`] when the latter is a template.
    pub fn flags(&self, config: Option<&Path>) -> Vec<String> {
        let mut flags = Vec::new();

        if let Some(config) = config {
            flags.push("-c".to_string());
            flags.push(config.display().to_string());
        }

        if self.help {
            flags.push("-h".to_string());
        }

        if let Some(interval) = self.interval {
            flags.push("-i".to_string());
            flags.push(interval.to_string());
        }

        if let Some(location) = &self.log_location {
            flags.push("-L".to_string());
            flags.push(location.display().to_string());
        }

        if let Some(level) = self.log_level {
            flags.push("-l".to_string());
            flags.push(level.to_string());
        }

        if let Some(count) = self.max_loops {
            flags.push("-m".to_string());
            flags.push(count.to_string());
        }

        flags
    }
}
