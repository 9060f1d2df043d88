//! Process Execution Module
//!
//! Launches a command, optionally under a deadline, captures its stdout and
//! stderr, and classifies the run.
//!
//! # Timeout Behavior
//!
//! When a command exceeds its timeout:
//! - Output buffered so far is reported (empty if none)
//! - The exit code is synthesized: `-1` if stderr is non-empty, else `0`
//! - The child is killed and reaped unless the invocation opts out
//!
//! # Classification
//!
//! [`run`] fails on any non-zero exit code. A zero exit with output on stderr
//! also fails, unless the profiling tolerance is enabled and stderr mentions
//! `profiling`. Comparing the exit code against an expected value is left to
//! the caller.

mod error;
mod executor;
mod result;
mod spec;


use tracing::warn;

pub use error::RunError;
pub use executor::{
    execute, timeout_exit_code, TIMEOUT_SILENT_EXIT_CODE, TIMEOUT_STDERR_EXIT_CODE,
};
pub use result::{classify, InvocationResult, Outcome};
pub use spec::{CommandLine, InvocationSpec, PROFILING_MARKER};

/// Execute `spec` and return its stdout, failing unless the run classifies
/// as a success or a tolerated failure.
pub fn run(spec: &InvocationSpec) -> Result<String, RunError> {
    let result = execute(spec)?;

    match classify(&result, spec.ignore_profiling_errors) {
        Outcome::Success { stdout } => Ok(stdout),
        Outcome::ToleratedFailure { stdout, stderr, .. } => {
            warn!(command = %result.command, stderr = %stderr, "ignoring profiling noise on stderr");
            Ok(stdout)
        }
        Outcome::HardFailure {
            exit_code,
            stdout,
            stderr,
            ..
        } => Err(RunError::CommandFailed {
            command: result.command,
            exit_code,
            stdout,
            stderr,
        }),
    }
}
