//! SVG graph output: series accumulation, layout and document framing.

pub mod clock;
pub mod document;
pub mod draw;
pub mod layout;
pub mod palette;
pub mod series;

pub use draw::{GraphSet, draw_activity_graphs};
pub use layout::{Metric, View, ViewKind};
pub use series::{GraphSeries, graph_lines};

use crate::archive::{FileHeader, RecordHeader};
use crate::config::DisplayOptions;

/// Per-report drawing state shared by every activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvgParams {
    /// Rows of views emitted so far.
    pub graph_no: usize,
    /// Widest row, for packed views.
    pub max_views: usize,
    /// A restart record was read since the previous sample.
    pub restart: bool,
    /// Time axis origin and end, seconds since the epoch.
    pub ust_time_ref: u64,
    pub ust_time_end: u64,
    /// Time of the first sample of the report.
    pub ust_time_first: u64,
    /// Seconds since the previous sample.
    pub dt: u64,
    /// Recorded wall clock at the time origin, for true-time labels.
    pub clock_ref: clock::WallClock,
}

#[derive(Debug)]
pub struct SvgContext<'a> {
    pub opts: &'a DisplayOptions,
    pub file: &'a FileHeader,
    pub params: SvgParams,
    /// Document body built so far.
    pub out: String,
}

impl<'a> SvgContext<'a> {
    pub fn new(opts: &'a DisplayOptions, file: &'a FileHeader, params: SvgParams) -> Self {
        Self {
            opts,
            file,
            params,
            out: String::new(),
        }
    }

    /// X coordinate of a sample, relative to the time origin.
    pub fn timetag(&self, hdr: &RecordHeader) -> u64 {
        hdr.ust_time.saturating_sub(self.params.ust_time_ref)
    }
}
