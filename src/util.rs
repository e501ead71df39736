use crate::error::ConfigError;
use chrono::{DateTime, Utc};

pub const SOURCE_DATE_EPOCH_ENV: &str = "SOURCE_DATE_EPOCH";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSource {
    Flag,
    SourceDateEpoch,
    WallClock,
}

impl ClockSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::SourceDateEpoch => "SOURCE_DATE_EPOCH",
            Self::WallClock => "wall-clock",
        }
    }
}

/// Return the current Unix epoch in seconds.
pub fn now_epoch_secs() -> i64 {
    Utc::now().timestamp()
}

/// Pick the build timestamp: explicit flag, then `SOURCE_DATE_EPOCH`, then the clock.
pub fn build_epoch_secs(
    flag: Option<i64>,
    source_date_epoch: Option<&str>,
) -> Result<(i64, ClockSource), ConfigError> {
    if let Some(secs) = flag {
        return Ok((secs, ClockSource::Flag));
    }
    if let Some(raw) = source_date_epoch.map(str::trim).filter(|s| !s.is_empty()) {
        let secs = raw.parse::<i64>().map_err(|_| {
            ConfigError::invalid(SOURCE_DATE_EPOCH_ENV, format!("`{raw}` is not an integer"))
        })?;
        return Ok((secs, ClockSource::SourceDateEpoch));
    }
    Ok((now_epoch_secs(), ClockSource::WallClock))
}

pub fn format_epoch_rfc3339(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| format!("@{secs}"))
}
