//! Errors raised while launching or classifying a subprocess

/// Failure of a single invocation
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The command cannot be launched in the requested shape
    #[error("invalid command shape: {reason}")]
    InvalidCommandShape { reason: String },

    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to wait for '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit, or a zero exit with untolerated stderr
    #[error(
        "command '{command}' failed\n\tret = {exit_code}\n\tstdout = {stdout}\n\tstderr = {stderr}"
    )]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },
}

impl RunError {
    /// Exit code of a completed but failed command
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            RunError::CommandFailed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}
