//! Config file handed to one daemon run

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::template::{self, TemplateError};

/// The `-c` argument of a run, plus on-disk ownership of a resolved
/// template.
///
/// A resolved config is removed when this value is dropped, which covers
/// success, failure, and unwinding alike.
#[derive(Debug)]
pub struct ConfigFile {
    /// Path passed to the daemon
    arg: PathBuf,
    /// Resolved file on disk, owned by this value
    owned: Option<PathBuf>,
}

impl ConfigFile {
    /// Prepare `config` for a run from `work_dir`.
    ///
    /// A `.token` template is resolved into its stripped sibling; anything
    /// else is passed through untouched.
    pub fn prepare(config: &Path, work_dir: &Path) -> Result<Self, TemplateError> {
        let Some(arg) = template::resolved_path(config) else {
            return Ok(Self {
                arg: config.to_path_buf(),
                owned: None,
            });
        };

        // Nothing is owned until the template is known to open, so a missing
        // template never removes a file that was already there
        let source = work_dir.join(config);
        template::open_template(&source)?;

        let file = Self {
            owned: Some(work_dir.join(&arg)),
            arg,
        };
        if let Some(output) = &file.owned {
            template::resolve(&source, output)?;
            debug!(config = %output.display(), "materialized config template");
        }

        Ok(file)
    }

    pub fn arg(&self) -> &Path {
        &self.arg
    }

    /// The resolved file this value will delete, if any
    pub fn resolved(&self) -> Option<&Path> {
        self.owned.as_deref()
    }
}

impl Drop for ConfigFile {
    fn drop(&mut self) {
        let Some(path) = self.owned.take() else {
            return;
        };
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(config = %path.display(), error = %e, "failed to remove resolved config"),
        }
    }
}
