//! Running the registered tests against a stand-in daemon

use belayd_ftests::cases;
use belayd_ftests::config::{HarnessConfig, SkipEntry};
use belayd_ftests::suite::{SuiteRunner, TestStatus};
use std::path::PathBuf;

use super::helpers::{copy_shipped_template, harness_with_daemon};

const TEMPLATE: &str = "001-cause-time_of_day.json.token";

#[test]
fn test_time_of_day_passes_on_expected_return() {
    // Exits 42 only when handed the resolved config
    let (temp, config) =
        harness_with_daemon("test -f \"$2\" || exit 9; grep -q '<< now' \"$2\" && exit 8; exit 42")
            .unwrap();
    copy_shipped_template(temp.path(), TEMPLATE).unwrap();

    let report = SuiteRunner::new(config, cases::all()).run();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].id, "001-cause-time_of_day");
    assert_eq!(report.results[0].status, TestStatus::Passed);
    assert!(report.all_passed());
    assert!(!temp.path().join("001-cause-time_of_day.json").exists());
}

#[test]
fn test_time_of_day_fails_on_other_return() {
    let (temp, config) = harness_with_daemon("exit 1").unwrap();
    copy_shipped_template(temp.path(), TEMPLATE).unwrap();

    let report = SuiteRunner::new(config, cases::all()).run();

    let result = &report.results[0];
    assert_eq!(result.status, TestStatus::Failed);
    assert!(result.cause.as_deref().unwrap().contains("ret = 1"));
    assert!(!report.all_passed());
}

#[test]
fn test_missing_daemon_is_skipped() {
    let config = HarnessConfig {
        daemon_path: PathBuf::from("/nonexistent/src/belayd"),
        ..Default::default()
    };

    let report = SuiteRunner::new(config, cases::all()).run();

    assert_eq!(report.results[0].status, TestStatus::Skipped);
    assert!(report.all_passed());
}

#[test]
fn test_skip_list_keeps_daemon_idle() {
    let (temp, mut config) = harness_with_daemon("touch ran; exit 42").unwrap();
    copy_shipped_template(temp.path(), TEMPLATE).unwrap();
    config.skip_list = vec![SkipEntry::Id("001-cause-time_of_day".to_string())];

    let report = SuiteRunner::new(config, cases::all()).run();

    assert_eq!(report.skipped_count(), 1);
    assert!(!temp.path().join("ran").exists());
}
