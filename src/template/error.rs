//! Errors raised while materializing a config template

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write resolved config {}: {source}", path.display())]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token whose body the resolver rejected, or that never closes
    #[error("invalid token '{token}' on line {line}: {reason}")]
    TokenParseError {
        line: usize,
        token: String,
        reason: String,
    },
}
