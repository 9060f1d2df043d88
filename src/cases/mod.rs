//! The registered functional tests

mod time_of_day;

use crate::config::HarnessConfig;
use crate::suite::{FunctionalTest, StageResult};

pub use time_of_day::CauseTimeOfDay;

/// Every functional test shipped with the harness
pub fn all() -> Vec<Box<dyn FunctionalTest>> {
    vec![Box::new(CauseTimeOfDay)]
}

/// Shared prereq: the daemon binary exists and is executable
pub fn daemon_available(config: &HarnessConfig) -> StageResult {
    match which::which(&config.daemon_path) {
        Ok(_) => StageResult::passed(),
        Err(e) => StageResult::skipped(format!(
            "belayd binary {} is not available: {e}",
            config.daemon_path.display()
        )),
    }
}
