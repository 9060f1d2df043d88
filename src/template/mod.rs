//! Config template materialization.
//!
//! Templates are belayd config files with embedded tokens that can only be
//! computed right before the daemon starts. Tokens use the form
//! `<< kind body>>`; the only kind today is `now`:
//!
//! ```text
//! "time": "<< now 5>>"      ->   "time": "10:00:05"
//! ```
//!
//! A template's file name ends in [`TEMPLATE_SUFFIX`]; it is resolved into the
//! sibling path with the suffix stripped. The resolved file is owned by
//! whoever asked for it; nothing here deletes it.

mod error;
mod lexer;
mod now;


use std::path::{Path, PathBuf};

pub use error::TemplateError;
pub use lexer::{open_template, Resolver, TokenKind, TokenRegistry};
pub use now::{parse_offset, Clock, LocalClock, NowResolver, NOW_OPEN, TIME_FORMAT, TOKEN_CLOSE};

/// File name suffix marking a config as a template
pub const TEMPLATE_SUFFIX: &str = ".token";

/// Resolve `template` into `output` with the default token kinds
pub fn resolve(template: &Path, output: &Path) -> Result<(), TemplateError> {
    TokenRegistry::with_defaults().resolve_file(template, output)
}

/// Where a template resolves to, or `None` if `path` is not a template
pub fn resolved_path(path: &Path) -> Option<PathBuf> {
    let stripped = path.to_str()?.strip_suffix(TEMPLATE_SUFFIX)?;
    if stripped.is_empty() || stripped.ends_with(std::path::MAIN_SEPARATOR) {
        return None;
    }
    Some(PathBuf::from(stripped))
}
