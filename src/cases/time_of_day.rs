//! 001: the time-of-day cause fires once its configured time has passed

use anyhow::{Context, Result};

use crate::config::HarnessConfig;
use crate::daemon::{Belayd, DaemonArgs};
use crate::suite::{FunctionalTest, StageResult};

const CONFIG: &str = "001-cause-time_of_day.json.token";
const INTERVAL: u32 = 1;
const MAX_LOOPS: u32 = 10;
/// Return value of the validate effect in the config
const EXPECTED_RET: i32 = 42;

pub struct CauseTimeOfDay;

impl FunctionalTest for CauseTimeOfDay {
    fn number(&self) -> u32 {
        1
    }

    fn suite(&self) -> &str {
        "causes"
    }

    fn name(&self) -> &str {
        "cause-time_of_day"
    }

    fn prereqs(&self, config: &HarnessConfig) -> StageResult {
        super::daemon_available(config)
    }

    fn test(&self, config: &HarnessConfig) -> Result<StageResult> {
        let args = DaemonArgs::new()
            .config(CONFIG)
            .interval(INTERVAL)
            .max_loops(MAX_LOOPS)
            .expected_ret(EXPECTED_RET);

        Belayd::new(config)
            .run(&args)
            .context("belayd did not trip the time-of-day rule")?;

        Ok(StageResult::passed())
    }
}
