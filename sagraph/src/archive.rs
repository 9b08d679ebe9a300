//! JSON-lines archive of persisted samples.
//!
//! The first line is a [`FileHeader`], each following line one [`Record`]
//! tagged by `type`. Blank lines are ignored.

use crate::error::{Error, Result};
use chrono::{DateTime, FixedOffset, Timelike};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Activity present in the archive and its item counts at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub name: String,
    #[serde(default = "one")]
    pub nr: usize,
    #[serde(default = "one")]
    pub nr2: usize,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHeader {
    pub nodename: String,
    pub sysname: String,
    pub release: String,
    pub machine: String,
    /// Timezone name of the host that recorded the archive.
    pub tz_name: String,
    pub utc_offset_secs: i32,
    /// Creation time, seconds since the epoch.
    pub ust_time: u64,
    pub activities: Vec<ActivityEntry>,
}

impl FileHeader {
    pub fn activity(&self, name: &str) -> Option<&ActivityEntry> {
        self.activities
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

/// Timing of one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordHeader {
    /// Seconds since the epoch.
    pub ust_time: u64,
    /// Machine uptime in hundredths of a second; 0 when unknown.
    pub uptime_cs: u64,
    /// Wall clock of the recording host.
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl RecordHeader {
    /// Header for `ust_time`, with the wall clock of a host `utc_offset_secs`
    /// east of UTC.
    pub fn new(ust_time: u64, uptime_cs: u64, utc_offset_secs: i32) -> Self {
        let clock = i64::try_from(ust_time)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .zip(FixedOffset::east_opt(utc_offset_secs))
            .map(|(utc, tz)| utc.with_timezone(&tz));
        let (hour, minute, second) = clock
            .map(|t| (t.hour() as u8, t.minute() as u8, t.second() as u8))
            .unwrap_or_default();
        Self {
            ust_time,
            uptime_cs,
            hour,
            minute,
            second,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    /// One sample. Payloads are keyed by activity name (`A_CPU`, ...).
    Stats {
        header: RecordHeader,
        #[serde(default)]
        activities: BTreeMap<String, serde_json::Value>,
    },
    /// Counters were reset; the next sample starts a new baseline.
    Restart { header: RecordHeader },
    Comment { header: RecordHeader, text: String },
}

impl Record {
    pub fn header(&self) -> &RecordHeader {
        match self {
            Record::Stats { header, .. }
            | Record::Restart { header }
            | Record::Comment { header, .. } => header,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Archive {
    pub header: FileHeader,
    pub records: Vec<Record>,
}

impl Archive {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!("[archive] reading {}", path.display());
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut header = None;
        let mut records = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let text = line.trim();
            if text.is_empty() {
                continue;
            }
            let parse_err = |source: serde_json::Error| Error::Archive {
                line: idx + 1,
                source,
            };
            if header.is_none() {
                header = Some(serde_json::from_str::<FileHeader>(text).map_err(parse_err)?);
                continue;
            }
            records.push(serde_json::from_str::<Record>(text).map_err(parse_err)?);
        }

        let header = header.ok_or(Error::MissingHeader)?;
        if records.windows(2).any(|w| w[1].header().ust_time < w[0].header().ust_time) {
            warn!("[archive] records are not in chronological order");
        }
        debug!(
            "[archive] {} records from {}",
            records.len(),
            header.nodename
        );
        Ok(Self { header, records })
    }

    /// Stats records only.
    pub fn samples(&self) -> impl Iterator<Item = &Record> {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Stats { .. }))
    }

    /// Whether any sample carries a payload for `name`.
    pub fn has_activity(&self, name: &str) -> bool {
        self.header.activity(name).is_some()
            || self.records.iter().any(|r| match r {
                Record::Stats { activities, .. } => activities.contains_key(name),
                _ => false,
            })
    }
}

/// Appends records to an archive file, one JSON document per line.
#[derive(Debug)]
pub struct ArchiveWriter {
    path: PathBuf,
}

impl ArchiveWriter {
    /// Creates (or truncates) `path` and writes the file header.
    pub fn create(path: impl Into<PathBuf>, header: &FileHeader) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&path)?;
        let line = serde_json::to_string(header).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")?;
        Ok(Self { path })
    }

    /// Opens an existing archive for appending.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, record: &Record) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
