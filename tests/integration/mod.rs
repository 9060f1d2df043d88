//! Integration tests for the belayd functional test harness
//!
//! These run a stand-in belayd (a small shell script) through the daemon
//! adapter and the suite driver.

mod daemon_invocation;
mod helpers;
mod suite_run;
