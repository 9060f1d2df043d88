//! The `now` token: local wall-clock time plus an offset in seconds

use chrono::{Local, NaiveDateTime, TimeDelta};

use super::lexer::Resolver;

/// Open marker of the `now` token
pub const NOW_OPEN: &str = "<< now";

/// Close marker shared by all token kinds
pub const TOKEN_CLOSE: &str = ">>";

/// Output format of a resolved `now` token
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Source of "now" for time-based tokens
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The local wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Resolves `<< now <offset>>>` to `HH:MM:SS` at resolve time
#[derive(Debug, Default, Clone)]
pub struct NowResolver<C = LocalClock> {
    clock: C,
}

impl<C: Clock> NowResolver<C> {
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }
}

/// Parse a token body as a signed count of seconds; spaces are ignored
pub fn parse_offset(body: &str) -> Result<i64, String> {
    let compact: String = body.chars().filter(|c| *c != ' ').collect();
    let compact = compact.trim();

    if compact.is_empty() {
        return Err("missing offset".to_string());
    }

    compact
        .parse::<i64>()
        .map_err(|e| format!("offset '{compact}' is not an integer: {e}"))
}

impl<C: Clock> Resolver for NowResolver<C> {
    fn resolve(&self, body: &str) -> Result<String, String> {
        let offset = parse_offset(body)?;
        let delta = TimeDelta::try_seconds(offset)
            .ok_or_else(|| format!("offset {offset} is out of range"))?;
        let when = self
            .clock
            .now()
            .checked_add_signed(delta)
            .ok_or_else(|| format!("offset {offset} is out of range"))?;

        Ok(when.format(TIME_FORMAT).to_string())
    }
}
