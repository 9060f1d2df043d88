//! Invocation results and their classification

use std::time::Duration;

use super::spec::PROFILING_MARKER;

/// What a single invocation produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub command: String,
    /// Real exit code, `-signal` for a signalled child, or the synthetic
    /// timeout code (see [`timeout_exit_code`](super::timeout_exit_code))
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// Whether the deadline elapsed before the process exited
    pub timed_out: bool,
    pub duration: Duration,
}

/// Classification of an [`InvocationResult`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Zero exit and nothing on stderr
    Success { stdout: String },
    /// Zero exit with stderr noise that the policy forgives
    ToleratedFailure {
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
    HardFailure {
        exit_code: i32,
        stdout: String,
        stderr: String,
        message: String,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::HardFailure { .. })
    }
}

/// Classify a result.
///
/// A non-zero exit code is always a hard failure. On a zero exit, non-empty
/// stderr is a hard failure unless `ignore_profiling_errors` is set and the
/// stderr mentions [`PROFILING_MARKER`].
pub fn classify(result: &InvocationResult, ignore_profiling_errors: bool) -> Outcome {
    if result.exit_code != 0 || !result.stderr.is_empty() {
        let tolerated = result.exit_code == 0
            && ignore_profiling_errors
            && result.stderr.contains(PROFILING_MARKER);

        if tolerated {
            return Outcome::ToleratedFailure {
                exit_code: result.exit_code,
                stdout: result.stdout.clone(),
                stderr: result.stderr.clone(),
            };
        }

        return Outcome::HardFailure {
            exit_code: result.exit_code,
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
            message: format!("Command '{}' failed", result.command),
        };
    }

    Outcome::Success {
        stdout: result.stdout.clone(),
    }
}
