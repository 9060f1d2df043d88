//! Token registry and line scanner

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;
use tracing::debug;

use super::error::TemplateError;
use super::now::{LocalClock, NowResolver, NOW_OPEN, TOKEN_CLOSE};

/// Turns the body of a token into its replacement text.
///
/// The error is a human-readable reason; the registry attaches the line and
/// token text.
pub trait Resolver: Send + Sync {
    fn resolve(&self, body: &str) -> Result<String, String>;
}

/// One registered token kind
pub struct TokenKind {
    pub name: &'static str,
    pub open: String,
    pub close: String,
    resolver: Box<dyn Resolver>,
}

impl std::fmt::Debug for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKind")
            .field("name", &self.name)
            .field("open", &self.open)
            .field("close", &self.close)
            .finish_non_exhaustive()
    }
}

/// Open `template` for reading, telling a missing file apart from an
/// unreadable one
pub fn open_template(template: &Path) -> Result<File, TemplateError> {
    File::open(template).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            TemplateError::TemplateNotFound {
                path: template.to_path_buf(),
            }
        } else {
            TemplateError::TemplateRead {
                path: template.to_path_buf(),
                source,
            }
        }
    })
}

/// Byte offsets of one token occurrence within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TokenSpan {
    start: usize,
    body_start: usize,
    body_end: usize,
    end: usize,
}

/// Ordered set of token kinds.
///
/// Each line is scanned once per kind, in registration order, and only the
/// first occurrence of a kind on a line is replaced. A later kind sees the
/// line as already rewritten by the earlier ones.
#[derive(Debug, Default)]
pub struct TokenRegistry {
    kinds: Vec<TokenKind>,
}

impl TokenRegistry {
    /// A registry with no token kinds; every line is copied as is
    pub fn empty() -> Self {
        Self::default()
    }

    /// The registry used for belayd configs: just the `now` token
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register("now", NOW_OPEN, TOKEN_CLOSE, NowResolver::<LocalClock>::default());
        registry
    }

    pub fn register(
        &mut self,
        name: &'static str,
        open: &str,
        close: &str,
        resolver: impl Resolver + 'static,
    ) -> &mut Self {
        self.kinds.push(TokenKind {
            name,
            open: open.to_string(),
            close: close.to_string(),
            resolver: Box::new(resolver),
        });
        self
    }

    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    /// Resolve the tokens on one line. `line_no` is 1-based and only used
    /// for error reporting.
    pub fn resolve_line(&self, line: &str, line_no: usize) -> Result<String, TemplateError> {
        let mut current = line.to_string();

        for kind in &self.kinds {
            let Some(span) = find_token(&current, &kind.open, &kind.close, line_no)? else {
                continue;
            };

            let body = &current[span.body_start..span.body_end];
            let value = kind
                .resolver
                .resolve(body)
                .map_err(|reason| TemplateError::TokenParseError {
                    line: line_no,
                    token: current[span.start..span.end].to_string(),
                    reason,
                })?;

            debug!(kind = kind.name, line = line_no, value = %value, "resolved token");
            current = format!("{}{}{}", &current[..span.start], value, &current[span.end..]);
        }

        Ok(current)
    }

    /// Materialize `template` into `output`.
    ///
    /// The output is created fresh. On error it may be left partially
    /// written; removing it is the caller's job.
    pub fn resolve_file(&self, template: &Path, output: &Path) -> Result<(), TemplateError> {
        let input = open_template(template)?;

        let write_error = |source| TemplateError::OutputWriteError {
            path: output.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(output).map_err(write_error)?);
        let mut reader = BufReader::new(input);

        let mut line = String::new();
        let mut line_no = 0;
        loop {
            line.clear();
            let read = reader
                .read_line(&mut line)
                .map_err(|source| TemplateError::TemplateRead {
                    path: template.to_path_buf(),
                    source,
                })?;
            if read == 0 {
                break;
            }
            line_no += 1;

            let resolved = self.resolve_line(&line, line_no)?;
            writer.write_all(resolved.as_bytes()).map_err(write_error)?;
        }

        writer.flush().map_err(write_error)?;

        debug!(
            template = %template.display(),
            output = %output.display(),
            lines = line_no,
            "resolved config template"
        );
        Ok(())
    }
}

/// Locate the first `open ... close` occurrence on a line
fn find_token(
    line: &str,
    open: &str,
    close: &str,
    line_no: usize,
) -> Result<Option<TokenSpan>, TemplateError> {
    let Some(start) = line.find(open) else {
        return Ok(None);
    };
    let body_start = start + open.len();

    let Some(body_len) = line[body_start..].find(close) else {
        return Err(TemplateError::TokenParseError {
            line: line_no,
            token: line[start..].trim_end().to_string(),
            reason: format!("missing closing '{close}'"),
        });
    };
    let body_end = body_start + body_len;

    Ok(Some(TokenSpan {
        start,
        body_start,
        body_end,
        end: body_end + close.len(),
    }))
}
