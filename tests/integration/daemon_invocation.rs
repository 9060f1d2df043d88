//! Daemon adapter: flag assembly, template lifecycle and exit code handling

use belayd_ftests::daemon::{Belayd, DaemonArgs, DaemonError};
use belayd_ftests::process::RunError;
use belayd_ftests::template;
use chrono::NaiveTime;
use std::fs;
use std::time::Duration;

use super::helpers::{copy_shipped_template, harness_with_daemon};

#[test]
fn test_template_config_is_stripped_and_removed() {
    let (temp, config) = harness_with_daemon("echo \"$@\"").unwrap();
    fs::write(temp.path().join("foo.json.token"), "start = << now 5>>\n").unwrap();

    let args = DaemonArgs::new()
        .config("foo.json.token")
        .interval(1)
        .max_loops(10);
    let stdout = Belayd::new(&config).run(&args).unwrap();

    assert_eq!(stdout, "-c foo.json -i 1 -m 10");
    assert!(!temp.path().join("foo.json").exists());
    assert!(temp.path().join("foo.json.token").exists());
}

#[test]
fn test_daemon_reads_resolved_config() {
    let (temp, config) = harness_with_daemon("cat \"$2\"").unwrap();
    fs::write(temp.path().join("foo.json.token"), "start = << now 5>>\n").unwrap();

    let stdout = Belayd::new(&config)
        .run(&DaemonArgs::new().config("foo.json.token"))
        .unwrap();

    let time = stdout.strip_prefix("start = ").unwrap();
    assert!(NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok());
}

#[test]
fn test_plain_config_is_passed_through_and_kept() {
    let (temp, config) = harness_with_daemon("echo \"$@\"").unwrap();
    fs::write(temp.path().join("plain.json"), "{}").unwrap();

    let stdout = Belayd::new(&config)
        .run(&DaemonArgs::new().config("plain.json").log_level(8))
        .unwrap();

    assert_eq!(stdout, "-c plain.json -l 8");
    assert!(temp.path().join("plain.json").exists());
}

#[test]
fn test_help_flag_alone() {
    let (_temp, config) = harness_with_daemon("echo \"$@\"").unwrap();

    let stdout = Belayd::new(&config).run(&DaemonArgs::new().help()).unwrap();

    assert_eq!(stdout, "-h");
}

#[test]
fn test_command_line_starts_with_binary() {
    let (_temp, config) = harness_with_daemon("true").unwrap();
    let belayd = Belayd::new(&config);

    let argv = belayd.command_line(&DaemonArgs::new().interval(2), None);
    assert_eq!(argv[0], belayd.binary().display().to_string());
    assert_eq!(&argv[1..], ["-i", "2"]);
}

#[test]
fn test_expected_return_is_downgraded_to_success() {
    let (temp, config) = harness_with_daemon("echo tripped; exit 42").unwrap();
    fs::write(temp.path().join("foo.json.token"), "{}\n").unwrap();

    let args = DaemonArgs::new().config("foo.json.token").expected_ret(42);
    let stdout = Belayd::new(&config).run(&args).unwrap();

    assert_eq!(stdout, "tripped");
    assert!(!temp.path().join("foo.json").exists());
}

#[test]
fn test_unexpected_return_fails_and_still_removes_config() {
    let (temp, config) = harness_with_daemon("echo 'bad rule' >&2; exit 3").unwrap();
    fs::write(temp.path().join("foo.json.token"), "{}\n").unwrap();

    let args = DaemonArgs::new().config("foo.json.token").expected_ret(42);
    let err = Belayd::new(&config).run(&args).unwrap_err();

    match err {
        DaemonError::Run(RunError::CommandFailed {
            exit_code, stderr, ..
        }) => {
            assert_eq!(exit_code, 3);
            assert_eq!(stderr, "bad rule");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert!(!temp.path().join("foo.json").exists());
}

#[test]
fn test_stderr_on_clean_exit_fails_unless_profiling() {
    let (_temp, config) = harness_with_daemon("echo 'warning: odd config' >&2").unwrap();
    assert!(Belayd::new(&config).run(&DaemonArgs::new()).is_err());

    let (_temp, config) = harness_with_daemon("echo 'profiling: enabled' >&2").unwrap();
    assert!(Belayd::new(&config).run(&DaemonArgs::new()).is_ok());

    let (_temp, mut config) = harness_with_daemon("echo 'profiling: enabled' >&2").unwrap();
    config.ignore_profiling_errors = false;
    assert!(Belayd::new(&config).run(&DaemonArgs::new()).is_err());
}

#[test]
fn test_bad_template_never_starts_daemon() {
    let (temp, config) = harness_with_daemon("touch ran").unwrap();
    fs::write(temp.path().join("foo.json.token"), "start = << now later>>\n").unwrap();

    let err = Belayd::new(&config)
        .run(&DaemonArgs::new().config("foo.json.token"))
        .unwrap_err();

    assert!(matches!(err, DaemonError::Template(_)));
    assert!(!temp.path().join("ran").exists());
    assert!(!temp.path().join("foo.json").exists());
}

#[test]
fn test_timed_out_daemon_is_not_a_failure() {
    let (_temp, config) = harness_with_daemon("exec sleep 5").unwrap();

    let args = DaemonArgs::new().timeout(Duration::from_secs(1));
    let stdout = Belayd::new(&config).run(&args).unwrap();

    assert_eq!(stdout, "");
}

#[test]
fn test_shipped_template_resolves_to_valid_json() {
    let temp = tempfile::tempdir().unwrap();
    let template_path =
        copy_shipped_template(temp.path(), "001-cause-time_of_day.json.token").unwrap();
    let resolved = template::resolved_path(&template_path).unwrap();

    template::resolve(&template_path, &resolved).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&resolved).unwrap()).unwrap();
    let time = json["rules"][0]["causes"][0]["args"]["time"].as_str().unwrap();
    assert!(NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok());
    assert_eq!(json["rules"][0]["effects"][0]["args"]["return_value"], 42);
}
