//! Per-test results and the suite summary

use colored::Colorize;
use std::time::Duration;

use super::{FunctionalTest, StageResult, TestStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub id: String,
    pub suite: String,
    pub number: u32,
    pub status: TestStatus,
    pub cause: Option<String>,
    pub duration: Duration,
}

impl TestResult {
    pub fn new(test: &dyn FunctionalTest, stage: StageResult, duration: Duration) -> Self {
        Self {
            id: test.id(),
            suite: test.suite().to_string(),
            number: test.number(),
            status: stage.status,
            cause: stage.cause,
            duration,
        }
    }
}

/// Results of one suite run, in execution order
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub results: Vec<TestResult>,
}

impl SuiteReport {
    fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(TestStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(TestStatus::Skipped)
    }

    /// True when no test failed; skipped tests do not count against a run
    pub fn all_passed(&self) -> bool {
        self.failed_count() == 0
    }

    pub fn total_duration(&self) -> Duration {
        self.results.iter().map(|r| r.duration).sum()
    }

    /// Print one line per test followed by the totals
    pub fn print_summary(&self) {
        println!("\n{}", "Test Results:".bold());
        for result in &self.results {
            let status = match result.status {
                TestStatus::Passed => "PASSED".green().bold(),
                TestStatus::Failed => "FAILED".red().bold(),
                TestStatus::Skipped => "SKIPPED".yellow().bold(),
            };
            println!(
                "  {} {} ({}, {}ms)",
                status,
                result.id,
                result.suite,
                result.duration.as_millis()
            );
            if let Some(cause) = &result.cause {
                for line in cause.lines() {
                    println!("      {}", line.dimmed());
                }
            }
        }

        println!(
            "\n{} passed, {} failed, {} skipped ({}ms)",
            self.passed_count().to_string().green(),
            self.failed_count().to_string().red(),
            self.skipped_count().to_string().yellow(),
            self.total_duration().as_millis()
        );
    }
}
