//! Single-item system-wide families: task creation, swapping, paging, I/O
//! and run queue.

use super::{GraphData, GraphKind, Slot, plot_lines, sample_rates};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::buffer::save_extrema;
use crate::error::Result;
use crate::record::{IoStats, PagingStats, PcswStats, QueueStats, SwapStats};
use crate::svg::{Metric, SvgContext, View};

const PROC: [Metric; 1] = [Metric::float("proc/s")];
const CSWCH: [Metric; 1] = [Metric::float("cswch/s")];

#[derive(Debug, Clone, Copy, Default)]
pub struct PcswGraph;

impl GraphKind for PcswGraph {
    type Record = PcswStats;
    const ID: ActivityId = ActivityId::Pcsw;

    fn sample(
        &mut self,
        data: &mut GraphData<PcswStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        // proc/s is drawn first
        sample_rates(data, ctx, itv, hdr, &[1, 0]);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<PcswStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Task creation", &PROC),
            View::line("Switching activity", &CSWCH),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

const SWAP: [Metric; 2] = [Metric::float("pswpin/s"), Metric::float("pswpout/s")];

#[derive(Debug, Clone, Copy, Default)]
pub struct SwapGraph;

impl GraphKind for SwapGraph {
    type Record = SwapStats;
    const ID: ActivityId = ActivityId::Swap;

    fn sample(
        &mut self,
        data: &mut GraphData<SwapStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        sample_rates(data, ctx, itv, hdr, &[0, 1]);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<SwapStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [View::line("Swap activity", &SWAP)];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

const PGPG: [Metric; 2] = [Metric::float("pgpgin/s"), Metric::float("pgpgout/s")];
const FAULTS: [Metric; 2] = [Metric::float("fault/s"), Metric::float("majflt/s")];
const RECLAIM: [Metric; 4] = [
    Metric::float("pgfree/s"),
    Metric::float("pgscank/s"),
    Metric::float("pgscand/s"),
    Metric::float("pgsteal/s"),
];
const TIERING: [Metric; 2] = [Metric::float("pgprom/s"), Metric::float("pgdem/s")];

#[derive(Debug, Clone, Copy, Default)]
pub struct PagingGraph;

impl GraphKind for PagingGraph {
    type Record = PagingStats;
    const ID: ActivityId = ActivityId::Page;

    fn sample(
        &mut self,
        data: &mut GraphData<PagingStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        sample_rates(data, ctx, itv, hdr, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<PagingStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Paging activity (1)", &PGPG),
            View::line("Paging activity (2)", &FAULTS),
            View::line("Paging activity (3)", &RECLAIM),
            View::line("Paging activity (4)", &TIERING),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

const TRANSFERS: [Metric; 4] = [
    Metric::float("tps"),
    Metric::float("rtps"),
    Metric::float("wtps"),
    Metric::float("dtps"),
];
const BLOCKS: [Metric; 3] = [
    Metric::float("bread/s"),
    Metric::float("bwrtn/s"),
    Metric::float("bdscd/s"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct IoGraph;

impl GraphKind for IoGraph {
    type Record = IoStats;
    const ID: ActivityId = ActivityId::Io;

    fn sample(
        &mut self,
        data: &mut GraphData<IoStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        // Totals go down when a device is unmounted; rates clamp to 0.
        sample_rates(data, ctx, itv, hdr, &[0, 1, 2, 4, 5, 3, 6]);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<IoStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("I/O and transfer rate statistics (1)", &TRANSFERS),
            View::line("I/O and transfer rate statistics (2)", &BLOCKS),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

const RUNQ: [Metric; 2] = [Metric::int("runq-sz"), Metric::int("blocked")];
const PLIST: [Metric; 1] = [Metric::int("plist-sz")];
const LDAVG: [Metric; 3] = [
    Metric::float("ldavg-1"),
    Metric::float("ldavg-5"),
    Metric::float("ldavg-15"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueGraph;

impl GraphKind for QueueGraph {
    type Record = QueueStats;
    const ID: ActivityId = ActivityId::Queue;

    fn sample(
        &mut self,
        data: &mut GraphData<QueueStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((q, _)) = data.single_pair() else {
            return;
        };
        // Gauges: extrema on the raw values.
        save_extrema(&q, None, itv, &mut data.state.extrema, 0, &[0, 1, 2, 3, 4, 5]);

        let t = ctx.timetag(hdr);
        let restart = ctx.params.restart;
        let series = data.item_series(0);
        let gauges = [q.nr_running, q.procs_blocked, u64::from(q.nr_threads)];
        for (s, v) in series.iter_mut().zip(gauges) {
            s.int_point(t, v, restart);
        }
        let loads = [q.load_avg_1, q.load_avg_5, q.load_avg_15].map(|l| f64::from(l) / 100.0);
        plot_lines(series.get_mut(3..).unwrap_or_default(), t, &loads, restart);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<QueueStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        for field in 3..6 {
            data.state.extrema.scale(0, field, 100.0);
        }
        let views = [
            View::line("Queue length", &RUNQ),
            View::line("Task list statistics", &PLIST),
            View::line("Load average statistics", &LDAVG),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayOptions;
    use crate::registry::Selection;
    use crate::render::Graph;
    use crate::render::testing::run;
    use serde_json::json;

    #[test]
    fn test_pcsw_views() {
        let mut g = Graph::new(PcswGraph, Selection::default());
        let samples = [
            json!({"processes": 100, "context_switch": 0}),
            json!({"processes": 160, "context_switch": 6000}),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 60);
        assert_eq!(params.graph_no, 2);
        assert!(svg.contains("<g id=\"g2-0\""));
        assert!(svg.contains(">Task creation\n"));
        assert!(svg.contains("proc/s (1.00, 1.00)"));
        assert!(svg.contains("cswch/s (100.00, 100.00)"));
        assert!(svg.contains("d=\" M60,1.00\""));
    }

    #[test]
    fn test_swap_single_view() {
        let mut g = Graph::new(SwapGraph, Selection::default());
        let samples = [
            json!({"pswpin": 0, "pswpout": 0}),
            json!({"pswpin": 20, "pswpout": 10}),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 10);
        assert_eq!(params.graph_no, 1);
        assert!(svg.contains("pswpin/s (2.00, 2.00)"));
        assert!(svg.contains("pswpout/s (1.00, 1.00)"));
    }

    #[test]
    fn test_counter_reset_keeps_line_going() {
        let mut g = Graph::new(SwapGraph, Selection::default());
        let samples: Vec<_> = [0u64, 100, 250, 50, 80]
            .into_iter()
            .map(|n| json!({"pswpin": n}))
            .collect();
        let (svg, _) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        // The sample after the reset reads 0 and is joined to the line.
        assert!(svg.contains("d=\" M1,100.00 L2,150.00 L3,0.00 L4,30.00\""));
        assert!(svg.contains("pswpin/s (0.00, 150.00)"));
    }

    #[test]
    fn test_paging_packed() {
        let mut g = Graph::new(PagingGraph, Selection::default());
        let opts = DisplayOptions {
            pack: true,
            ..Default::default()
        };
        let samples = [json!({}), json!({"pgfault": 500, "pgdemote": 5})];
        let (svg, params) = run(&mut g, &opts, &samples, 5);
        assert_eq!(params.graph_no, 1);
        assert_eq!(params.max_views, 4);
        assert!(svg.contains("Paging activity (4)"));
        assert!(svg.contains("fault/s (100.00, 100.00)"));
        assert!(svg.contains("pgdem/s (1.00, 1.00)"));
    }

    #[test]
    fn test_io_field_order_and_clamp() {
        let mut g = Graph::new(IoGraph, Selection::default());
        let samples = [
            json!({"dk_drive": 100, "dk_drive_rblk": 0, "dk_drive_dio": 0}),
            json!({"dk_drive": 50, "dk_drive_rblk": 300, "dk_drive_dio": 10}),
        ];
        let (svg, _) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert!(svg.contains("tps (0.00, 0.00)"));
        assert!(svg.contains("dtps (10.00, 10.00)"));
        assert!(svg.contains("bread/s (300.00, 300.00)"));
    }

    #[test]
    fn test_queue_gauges_and_load() {
        let mut g = Graph::new(QueueGraph, Selection::default());
        let samples = [
            json!({"nr_running": 9, "load_avg_1": 900}),
            json!({"nr_running": 3, "procs_blocked": 1, "nr_threads": 250, "load_avg_1": 150}),
            json!({"nr_running": 5, "procs_blocked": 0, "nr_threads": 260, "load_avg_1": 275}),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 60);
        assert_eq!(params.graph_no, 3);
        assert!(svg.contains("runq-sz (3, 5)"));
        assert!(svg.contains("plist-sz (250, 260)"));
        assert!(svg.contains("ldavg-1 (1.50, 2.75)"));
        assert!(svg.contains("d=\" M60,3 L120,5\""));
        assert!(svg.contains("d=\" M60,1.50 L120,2.75\""));
    }
}
