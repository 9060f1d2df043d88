//! Test selection and sequential suite execution

use tracing::info;

use super::lifecycle::run_test;
use super::report::{SuiteReport, TestResult};
use super::{FunctionalTest, StageResult};
use crate::config::HarnessConfig;

/// Runs the selected tests of a registered set, one after another
pub struct SuiteRunner {
    config: HarnessConfig,
    tests: Vec<Box<dyn FunctionalTest>>,
}

impl SuiteRunner {
    /// Tests are run in ascending (suite, number) order
    pub fn new(config: HarnessConfig, mut tests: Vec<Box<dyn FunctionalTest>>) -> Self {
        tests.sort_by(|a, b| (a.suite(), a.number()).cmp(&(b.suite(), b.number())));
        Self { config, tests }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Tests picked by the suite and number selection, skip list included
    pub fn selected(&self) -> Vec<&dyn FunctionalTest> {
        let mut selected: Vec<&dyn FunctionalTest> = Vec::new();
        for test in &self.tests {
            if self.config.runs_suite(test.suite()) && self.config.runs_num(test.number()) {
                selected.push(test.as_ref());
            }
        }
        selected
    }

    pub fn run(&self) -> SuiteReport {
        let mut report = SuiteReport::default();

        for test in self.selected() {
            if self.config.skips(test.number(), &test.id()) {
                info!(test = %test.id(), "in skip list");
                report.results.push(TestResult::new(
                    test,
                    StageResult::skipped("skip list"),
                    Default::default(),
                ));
                continue;
            }

            report.results.push(run_test(test, &self.config));
        }

        info!(
            passed = report.passed_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "suite finished"
        );
        report
    }
}
