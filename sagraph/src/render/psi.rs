//! Pressure-stall information for CPU, I/O and memory.
//!
//! Every family is made of blocks of four slots: the 10, 60 and 300 second
//! averages drawn as lines, then the share of the interval spent stalled
//! drawn as a bar.

use super::{GraphData, GraphKind, Slot, plot_lines};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::rate::psi_stall_pct;
use crate::record::{PsiCpuStats, PsiIoStats, PsiMemStats, StatRecord};
use crate::svg::{Metric, SvgContext, View};

/// Averages of one block, and its stall total before and after.
struct Pressure {
    avg: [u64; 3],
    prev_total: u64,
    curr_total: u64,
}

fn sample_blocks<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    itv: u64,
    hdr: &RecordHeader,
    blocks: &[Pressure],
) {
    let t = ctx.timetag(hdr);
    let dt = ctx.params.dt;
    let restart = ctx.params.restart;
    for (b, p) in blocks.iter().enumerate() {
        let base = b * 4;
        let stall = psi_stall_pct(p.prev_total, p.curr_total, itv);
        for (k, &avg) in p.avg.iter().enumerate() {
            data.state.extrema.save(0, base + k, avg as f64);
        }
        data.state.extrema.save(0, base + 3, stall);

        let Some(series) = data.item_series(0).get_mut(base..base + 4) else {
            continue;
        };
        let lines = p.avg.map(|a| a as f64 / 100.0);
        plot_lines(series, t, &lines, restart);
        if let Some(s) = series.get_mut(3) {
            s.bar(t, 0.0, stall, dt, false);
        }
    }
}

/// Averages are stored multiplied by 100.
fn finish_blocks<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &mut SvgContext<'_>,
    hdr: &RecordHeader,
    views: &[View<'_>],
) -> Result<()> {
    for field in 0..data.state.desc.xnr {
        if field % 4 != 3 {
            data.state.extrema.scale(0, field, 100.0);
        }
    }
    data.draw_item(ctx, views, Slot::single(), hdr)?;
    Ok(())
}

const SCPU: [Metric; 3] = [
    Metric::float("%scpu-10"),
    Metric::float("%scpu-60"),
    Metric::float("%scpu-300"),
];
const SCPU_STALL: [Metric; 1] = [Metric::float("%scpu")];

#[derive(Debug, Clone, Copy, Default)]
pub struct PsiCpuGraph;

impl GraphKind for PsiCpuGraph {
    type Record = PsiCpuStats;
    const ID: ActivityId = ActivityId::PsiCpu;

    fn sample(
        &mut self,
        data: &mut GraphData<PsiCpuStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((c, p)) = data.single_pair() else {
            return;
        };
        let some = Pressure {
            avg: [c.some_acpu_10, c.some_acpu_60, c.some_acpu_300],
            prev_total: p.some_cpu_total,
            curr_total: c.some_cpu_total,
        };
        sample_blocks(data, ctx, itv, hdr, &[some]);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<PsiCpuStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("CPU pressure trends (some tasks)", &SCPU),
            View::bar("CPU stall time (some tasks)", &SCPU_STALL),
        ];
        finish_blocks(data, ctx, hdr, &views)
    }
}

const SIO: [Metric; 3] = [
    Metric::float("%sio-10"),
    Metric::float("%sio-60"),
    Metric::float("%sio-300"),
];
const SIO_STALL: [Metric; 1] = [Metric::float("%sio")];
const FIO: [Metric; 3] = [
    Metric::float("%fio-10"),
    Metric::float("%fio-60"),
    Metric::float("%fio-300"),
];
const FIO_STALL: [Metric; 1] = [Metric::float("%fio")];

#[derive(Debug, Clone, Copy, Default)]
pub struct PsiIoGraph;

impl GraphKind for PsiIoGraph {
    type Record = PsiIoStats;
    const ID: ActivityId = ActivityId::PsiIo;

    fn sample(
        &mut self,
        data: &mut GraphData<PsiIoStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((c, p)) = data.single_pair() else {
            return;
        };
        let blocks = [
            Pressure {
                avg: [c.some_aio_10, c.some_aio_60, c.some_aio_300],
                prev_total: p.some_io_total,
                curr_total: c.some_io_total,
            },
            Pressure {
                avg: [c.full_aio_10, c.full_aio_60, c.full_aio_300],
                prev_total: p.full_io_total,
                curr_total: c.full_io_total,
            },
        ];
        sample_blocks(data, ctx, itv, hdr, &blocks);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<PsiIoStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("I/O pressure trends (some tasks)", &SIO),
            View::bar("I/O stall time (some tasks)", &SIO_STALL),
            View::line("I/O pressure trends (full)", &FIO),
            View::bar("I/O stall time (full)", &FIO_STALL),
        ];
        finish_blocks(data, ctx, hdr, &views)
    }
}

const SMEM: [Metric; 3] = [
    Metric::float("%smem-10"),
    Metric::float("%smem-60"),
    Metric::float("%smem-300"),
];
const SMEM_STALL: [Metric; 1] = [Metric::float("%smem")];
const FMEM: [Metric; 3] = [
    Metric::float("%fmem-10"),
    Metric::float("%fmem-60"),
    Metric::float("%fmem-300"),
];
const FMEM_STALL: [Metric; 1] = [Metric::float("%fmem")];

#[derive(Debug, Clone, Copy, Default)]
pub struct PsiMemGraph;

impl GraphKind for PsiMemGraph {
    type Record = PsiMemStats;
    const ID: ActivityId = ActivityId::PsiMem;

    fn sample(
        &mut self,
        data: &mut GraphData<PsiMemStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((c, p)) = data.single_pair() else {
            return;
        };
        let blocks = [
            Pressure {
                avg: [c.some_amem_10, c.some_amem_60, c.some_amem_300],
                prev_total: p.some_mem_total,
                curr_total: c.some_mem_total,
            },
            Pressure {
                avg: [c.full_amem_10, c.full_amem_60, c.full_amem_300],
                prev_total: p.full_mem_total,
                curr_total: c.full_mem_total,
            },
        ];
        sample_blocks(data, ctx, itv, hdr, &blocks);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<PsiMemStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Memory pressure trends (some tasks)", &SMEM),
            View::bar("Memory stall time (some tasks)", &SMEM_STALL),
            View::line("Memory pressure trends (full)", &FMEM),
            View::bar("Memory stall time (full)", &FMEM_STALL),
        ];
        finish_blocks(data, ctx, hdr, &views)
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
    fn test_psi_cpu() {
        let mut g = Graph::new(PsiCpuGraph, Selection::default());
        let samples = [
            json!({"some_cpu_total": 0}),
            json!({"some_acpu_10": 1250, "some_acpu_60": 800, "some_cpu_total": 500_000}),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 10);
        assert_eq!(params.graph_no, 2);
        assert!(svg.contains("%scpu-10 (12.50, 12.50)"));
        assert!(svg.contains("%scpu-60 (8.00, 8.00)"));
        assert!(svg.contains("d=\" M10,12.50\""));
        assert!(svg.contains("%scpu (5.00, 5.00)"));
        assert!(svg.contains("<rect x=\"0\" y=\"0.00\" height=\"5.00\" width=\"10\"/>"));
    }

    #[test]
    fn test_psi_io_full_block() {
        let mut g = Graph::new(PsiIoGraph, Selection::default());
        let samples = [
            json!({}),
            json!({"full_aio_300": 4200, "full_io_total": 20_000}),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert_eq!(params.graph_no, 4);
        assert!(svg.contains("I/O stall time (full)"));
        assert!(svg.contains("%fio-300 (42.00, 42.00)"));
        assert!(svg.contains("%fio (2.00, 2.00)"));
        assert!(svg.contains("%sio (0.00, 0.00)"));
    }

    #[test]
    fn test_psi_mem_titles() {
        let mut g = Graph::new(PsiMemGraph, Selection::default());
        let opts = DisplayOptions {
            pack: true,
            ..Default::default()
        };
        let samples = [json!({}), json!({"some_amem_10": 100})];
        let (svg, params) = run(&mut g, &opts, &samples, 1);
        assert_eq!(params.graph_no, 1);
        assert_eq!(params.max_views, 4);
        assert!(svg.contains("Memory pressure trends (some tasks)"));
        assert!(svg.contains("%smem-10 (1.00, 1.00)"));
    }
}
