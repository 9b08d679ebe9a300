//! Error types for the report engine.
//!
//! Only configuration and capacity problems surface here. Data-quality
//! anomalies (counter resets, tickless CPUs, missing previous records) are
//! absorbed by the rate computer and never become errors.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{activity}: {count} items exceeds the platform limit of {max}")]
    ItemCountExceeded {
        activity: &'static str,
        count: usize,
        max: usize,
    },

    #[error("unknown activity {0:?}")]
    UnknownActivity(String),

    #[error("{activity}: cannot decode sample payload: {source}")]
    Decode {
        activity: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("archive line {line}: {source}")]
    Archive {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("archive has no file header")]
    MissingHeader,

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("bad selection: {0}")]
    Selection(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("failed to format SVG output")]
    Format(#[from] std::fmt::Error),
}
