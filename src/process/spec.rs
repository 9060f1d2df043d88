//! Description of a single subprocess launch

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Substring of stderr that marks noise from a profiling-enabled build
pub const PROFILING_MARKER: &str = "profiling";

/// The command to launch, either as an argument vector or as one string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    /// Ordered argument vector; the first element is the program
    Args(Vec<String>),
    /// A single command string
    Line(String),
}

impl CommandLine {
    /// Single-line rendering used for logs and error payloads
    pub fn display(&self) -> String {
        match self {
            CommandLine::Args(args) => args.join(" "),
            CommandLine::Line(line) => line.clone(),
        }
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(args: Vec<String>) -> Self {
        CommandLine::Args(args)
    }
}

impl From<Vec<&str>> for CommandLine {
    fn from(args: Vec<&str>) -> Self {
        CommandLine::Args(args.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for CommandLine {
    fn from(args: &[&str]) -> Self {
        CommandLine::Args(args.iter().map(|a| a.to_string()).collect())
    }
}

impl From<String> for CommandLine {
    fn from(line: String) -> Self {
        CommandLine::Line(line)
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        CommandLine::Line(line.to_string())
    }
}

/// Immutable description of one subprocess launch.
///
/// Built with the consuming setters below and handed to
/// [`execute`](super::execute) or [`run`](super::run). A spec is meant to be
/// used for a single invocation.
#[derive(Debug, Clone)]
pub struct InvocationSpec {
    pub command: CommandLine,
    /// Run through `sh -c`; argument vectors are joined with single spaces
    pub shell: bool,
    /// Hard wall-clock deadline for the process wait
    pub timeout: Option<Duration>,
    /// Tolerate stderr containing [`PROFILING_MARKER`] on a zero exit
    pub ignore_profiling_errors: bool,
    /// Kill and reap the child when the deadline elapses
    pub kill_on_timeout: bool,
    pub working_dir: Option<PathBuf>,
}

impl InvocationSpec {
    pub fn new(command: impl Into<CommandLine>) -> Self {
        Self {
            command: command.into(),
            shell: false,
            timeout: None,
            ignore_profiling_errors: true,
            kill_on_timeout: true,
            working_dir: None,
        }
    }

    pub fn shell(mut self, shell: bool) -> Self {
        self.shell = shell;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn ignore_profiling_errors(mut self, ignore: bool) -> Self {
        self.ignore_profiling_errors = ignore;
        self
    }

    pub fn kill_on_timeout(mut self, kill: bool) -> Self {
        self.kill_on_timeout = kill;
        self
    }

    pub fn working_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// The command as it appears in logs
    pub fn display(&self) -> String {
        self.command.display()
    }
}
