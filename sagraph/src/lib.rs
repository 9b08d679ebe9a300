//! System activity report engine.
//!
//! Samples persisted in a JSON-lines [`archive`] are replayed two at a time
//! through double-buffered per-activity state, turned into rates, and drawn
//! by the [`render`] families as SVG time-series graphs.

pub mod activity;
pub mod archive;
pub mod buffer;
pub mod config;
pub mod error;
pub mod rate;
pub mod reconcile;
pub mod record;
pub mod registry;
pub mod render;
pub mod report;
pub mod svg;

pub use activity::{ActivityId, Descriptor};
pub use archive::{Archive, ArchiveWriter, FileHeader, Record, RecordHeader};
pub use config::{Config, DisplayOptions, Palette, TimeBasis};
pub use error::{Error, Result};
pub use registry::Selection;
pub use report::Report;
