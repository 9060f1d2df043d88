//! Interface to the belayd daemon under test
//!
//! Builds the daemon's command line, materializes `.token` config templates,
//! and runs the daemon through the process engine. A run that fails with the
//! caller's expected exit code counts as a success.

mod args;
mod config_file;

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::config::HarnessConfig;
use crate::process::{self, InvocationSpec, RunError};
use crate::template::TemplateError;

pub use args::DaemonArgs;
pub use config_file::ConfigFile;

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("config template: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Run(#[from] RunError),
}

/// Runs the daemon binary from a fixed working directory
#[derive(Debug, Clone)]
pub struct Belayd {
    binary: PathBuf,
    work_dir: PathBuf,
    ignore_profiling_errors: bool,
    default_timeout: Option<Duration>,
}

impl Belayd {
    /// Daemon runner for `config`: its binary, run from its tests directory
    pub fn new(config: &HarnessConfig) -> Self {
        Self {
            binary: absolute(&config.daemon_path),
            work_dir: absolute(&config.tests_dir),
            ignore_profiling_errors: config.ignore_profiling_errors,
            default_timeout: config.timeout(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Full argument vector for a run, with `config` as the `-c` value
    pub fn command_line(&self, args: &DaemonArgs, config: Option<&Path>) -> Vec<String> {
        let mut argv = vec![self.binary.display().to_string()];
        argv.extend(args.flags(config));
        argv
    }

    /// Run the daemon and return its stdout.
    ///
    /// A resolved config template is removed before this returns, whatever
    /// the outcome.
    pub fn run(&self, args: &DaemonArgs) -> Result<String, DaemonError> {
        let config = args
            .config
            .as_deref()
            .map(|path| ConfigFile::prepare(path, &self.work_dir))
            .transpose()?;

        let argv = self.command_line(args, config.as_ref().map(ConfigFile::arg));
        let mut spec = InvocationSpec::new(argv)
            .working_dir(&self.work_dir)
            .ignore_profiling_errors(self.ignore_profiling_errors);
        if let Some(timeout) = args.timeout.or(self.default_timeout) {
            spec = spec.timeout(timeout);
        }

        match process::run(&spec) {
            Ok(stdout) => Ok(stdout),
            Err(RunError::CommandFailed {
                exit_code, stdout, ..
            }) if args.expected_ret == Some(exit_code) => {
                info!(ret = exit_code, "belayd returned the expected exit code");
                Ok(stdout)
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
