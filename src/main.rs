use anyhow::{Context, Result};
use belayd_ftests::cases;
use belayd_ftests::config::{HarnessConfig, SkipEntry};
use belayd_ftests::logging::init_logging;
use belayd_ftests::suite::SuiteRunner;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "belayd-ftests")]
#[command(about = "Functional tests for the belayd daemon", long_about = None)]
#[command(version)]
struct Cli {
    /// Harness config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run tests from this suite ("allsuites" runs every suite)
    #[arg(short, long)]
    suite: Option<String>,

    /// Only run the test with this number
    #[arg(short, long)]
    num: Option<u32>,

    /// Tests to skip, by number or NNN-name identifier, comma separated
    #[arg(short = 'k', long, value_delimiter = ',')]
    skip: Vec<SkipEntry>,

    /// Path to the belayd binary
    #[arg(short, long)]
    daemon: Option<PathBuf>,

    /// Directory holding the config templates
    #[arg(short, long)]
    tests_dir: Option<PathBuf>,

    /// Harness log level, 1 (critical) to 8 (debug)
    #[arg(short = 'l', long)]
    log_level: Option<u8>,

    /// Harness log file
    #[arg(short = 'L', long)]
    log_file: Option<PathBuf>,

    /// Deadline for each daemon run, in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Fail daemon runs on any stderr output, profiling noise included
    #[arg(long)]
    strict_stderr: bool,

    /// List the selected tests instead of running them
    #[arg(long)]
    list: bool,

    /// Mirror the log to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn harness_config(&self) -> Result<HarnessConfig> {
        let mut config = HarnessConfig::load_or_default(self.config.as_deref())
            .context("Failed to load harness config")?;

        if let Some(suite) = &self.suite {
            config.suite = Some(suite.clone());
        }
        if let Some(num) = self.num {
            config.num = Some(num);
        }
        config.skip_list.extend(self.skip.iter().cloned());
        if let Some(daemon) = &self.daemon {
            config.daemon_path = daemon.clone();
        }
        if let Some(dir) = &self.tests_dir {
            config.tests_dir = dir.clone();
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(file) = &self.log_file {
            config.log_file = file.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = Some(timeout);
        }
        if self.strict_stderr {
            config.ignore_profiling_errors = false;
        }
        config.verbose |= self.verbose;

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.harness_config()?;

    init_logging(&config)?;
    info!("{config}");

    let runner = SuiteRunner::new(config, cases::all());

    if cli.list {
        for test in runner.selected() {
            println!("{} ({})", test.id(), test.suite());
        }
        return Ok(());
    }

    let report = runner.run();
    report.print_summary();

    if !report.all_passed() {
        std::process::exit(1);
    }
    Ok(())
}
