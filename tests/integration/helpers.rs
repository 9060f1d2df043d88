//! Test helper functions for integration tests

use anyhow::{Context, Result};
use belayd_ftests::config::HarnessConfig;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Writes an executable `belayd` stand-in with the given shell body
pub fn write_fake_daemon(dir: &Path, body: &str) -> Result<PathBuf> {
    let path = dir.join("belayd");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).context("Failed to write fake daemon")?;

    let mut perms = fs::metadata(&path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).context("Failed to make fake daemon executable")?;

    Ok(path)
}

/// Scratch directory holding a fake daemon, plus a harness config whose
/// daemon and tests directory point into it
pub fn harness_with_daemon(body: &str) -> Result<(TempDir, HarnessConfig)> {
    let temp = TempDir::new().context("Failed to create temp directory")?;
    let daemon = write_fake_daemon(temp.path(), body)?;

    let config = HarnessConfig {
        daemon_path: daemon,
        tests_dir: temp.path().to_path_buf(),
        ..Default::default()
    };
    Ok((temp, config))
}

/// Copies a template shipped in `ftests/` into `dir`
pub fn copy_shipped_template(dir: &Path, name: &str) -> Result<PathBuf> {
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("ftests").join(name);
    let target = dir.join(name);
    fs::copy(&source, &target)
        .with_context(|| format!("Failed to copy {}", source.display()))?;
    Ok(target)
}
