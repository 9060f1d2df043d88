//! Functional Test Driver
//!
//! Every functional test goes through the same lifecycle:
//!
//! 1. `prereqs` decides whether the test can run at all. Anything but a pass
//!    ends the test there; setup and teardown are not called.
//! 2. `setup` then `test` run in order.
//! 3. `teardown` runs once setup has started, whether setup or the test
//!    passed, failed, returned an error, or panicked.
//!
//! A test that fails never stops the suite; its error becomes the cause of
//! a failed result and the runner moves on.

mod lifecycle;
mod report;
mod runner;


use anyhow::Result;
use std::fmt;

use crate::config::HarnessConfig;

pub use lifecycle::run_test;
pub use report::{SuiteReport, TestResult};
pub use runner::SuiteRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Passed => write!(f, "passed"),
            TestStatus::Failed => write!(f, "failed"),
            TestStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Status of one lifecycle stage, with an optional human-readable cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub status: TestStatus,
    pub cause: Option<String>,
}

impl StageResult {
    pub fn passed() -> Self {
        Self {
            status: TestStatus::Passed,
            cause: None,
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Failed,
            cause: Some(cause.into()),
        }
    }

    pub fn skipped(cause: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            cause: Some(cause.into()),
        }
    }

    pub fn is_passed(&self) -> bool {
        self.status == TestStatus::Passed
    }
}

/// A numbered functional test belonging to a suite
pub trait FunctionalTest {
    fn number(&self) -> u32;

    fn suite(&self) -> &str;

    fn name(&self) -> &str;

    /// `NNN-name`, the way tests are listed and reported
    fn id(&self) -> String {
        format!("{:03}-{}", self.number(), self.name())
    }

    fn prereqs(&self, _config: &HarnessConfig) -> StageResult {
        StageResult::passed()
    }

    fn setup(&self, _config: &HarnessConfig) -> Result<()> {
        Ok(())
    }

    fn test(&self, config: &HarnessConfig) -> Result<StageResult>;

    fn teardown(&self, _config: &HarnessConfig) -> Result<()> {
        Ok(())
    }
}
