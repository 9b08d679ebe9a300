//! Timestamps on the time axis.

use crate::archive::{FileHeader, RecordHeader};
use std::fmt;
use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Clock used for time labels and day boundaries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeBasis {
    #[default]
    Utc,
    /// Timezone of the machine rendering the report.
    Local,
    /// Timezone of the machine that recorded the archive.
    True,
}

impl TimeBasis {
    /// `ust_time` in the selected zone. Out-of-range times fall back to the
    /// epoch.
    pub fn datetime(self, ust_time: u64, file: &FileHeader) -> DateTime<FixedOffset> {
        let utc = i64::try_from(ust_time)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_default();
        match self {
            TimeBasis::Utc => utc.with_timezone(&Utc.fix()),
            TimeBasis::Local => {
                let offset = Local.offset_from_utc_datetime(&utc.naive_utc()).fix();
                utc.with_timezone(&offset)
            }
            TimeBasis::True => {
                let offset = FixedOffset::east_opt(file.utc_offset_secs).unwrap_or(Utc.fix());
                utc.with_timezone(&offset)
            }
        }
    }

    /// Name printed beside the time axis.
    pub fn label(self, ust_time: u64, file: &FileHeader) -> String {
        match self {
            TimeBasis::Utc => "UTC".to_string(),
            TimeBasis::Local => self.datetime(ust_time, file).format("%Z").to_string(),
            TimeBasis::True => file.tz_name.clone(),
        }
    }

    /// `HH:MM:SS` of `ust_time`.
    pub fn clock(self, ust_time: u64, file: &FileHeader) -> String {
        self.datetime(ust_time, file).format("%H:%M:%S").to_string()
    }

    /// Hour and minute of `ust_time`.
    pub fn hour_minute(self, ust_time: u64, file: &FileHeader) -> (u32, u32) {
        let t = self.datetime(ust_time, file);
        (t.hour(), t.minute())
    }

    /// Report date, `YYYY-MM-DD`.
    pub fn date(self, ust_time: u64, file: &FileHeader) -> String {
        self.datetime(ust_time, file).format("%Y-%m-%d").to_string()
    }

    /// Midnight before `ust_time`, as seconds since the epoch.
    pub fn day_start(self, ust_time: u64, file: &FileHeader) -> u64 {
        let since_midnight = self.datetime(ust_time, file).num_seconds_from_midnight();
        ust_time.saturating_sub(since_midnight as u64)
    }
}

/// Wall clock of the recording host, as stored in each record header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallClock {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl WallClock {
    /// The clock `secs` seconds later, wrapping at midnight.
    pub fn advance(self, secs: u64) -> Self {
        let of_day = u64::from(self.hour) * 3600
            + u64::from(self.minute) * 60
            + u64::from(self.second);
        let t = (of_day + secs % 86_400) % 86_400;
        Self {
            hour: (t / 3600) as u8,
            minute: (t / 60 % 60) as u8,
            second: (t % 60) as u8,
        }
    }
}

impl From<&RecordHeader> for WallClock {
    fn from(hdr: &RecordHeader) -> Self {
        Self {
            hour: hdr.hour,
            minute: hdr.minute,
            second: hdr.second,
        }
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}
