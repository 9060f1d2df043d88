//! Prereqs, setup, test and teardown of a single functional test

use anyhow::{Context, Result};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{info, warn};

use super::report::TestResult;
use super::{FunctionalTest, StageResult};
use crate::config::HarnessConfig;

/// Run one test through its full lifecycle.
///
/// Never panics and never returns an error: every failure mode ends up as
/// the status and cause of the returned result.
pub fn run_test(test: &dyn FunctionalTest, config: &HarnessConfig) -> TestResult {
    let start = Instant::now();
    let id = test.id();

    let prereqs = test.prereqs(config);
    if !prereqs.is_passed() {
        info!(test = %id, status = %prereqs.status, cause = ?prereqs.cause, "prereqs not met");
        return TestResult::new(test, prereqs, start.elapsed());
    }

    info!(test = %id, "running");

    let body = catch_unwind(AssertUnwindSafe(|| -> Result<StageResult> {
        test.setup(config).context("setup failed")?;
        test.test(config)
    }));
    let teardown = catch_unwind(AssertUnwindSafe(|| test.teardown(config)));

    let mut stage = match body {
        Ok(Ok(stage)) => stage,
        Ok(Err(e)) => StageResult::failed(format!("{e:#}")),
        Err(panic) => StageResult::failed(format!("panicked: {}", panic_message(&*panic))),
    };

    let teardown_failure = match teardown {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(format!("teardown failed: {e:#}")),
        Err(panic) => Some(format!("teardown panicked: {}", panic_message(&*panic))),
    };
    if let Some(cause) = teardown_failure {
        warn!(test = %id, cause = %cause, "teardown failed");
        // An earlier failure is the more useful cause to report
        if stage.is_passed() {
            stage = StageResult::failed(cause);
        }
    }

    info!(test = %id, status = %stage.status, "finished");
    TestResult::new(test, stage, start.elapsed())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
