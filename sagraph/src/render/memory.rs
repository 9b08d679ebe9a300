//! Memory, swap and huge pages utilization, and kernel tables.

use super::{GraphData, GraphKind, Slot, sample_gauges};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::rate::sp_value;
use crate::record::{HugeStats, KtablesStats, MemoryStats};
use crate::svg::{GraphSeries, Metric, SvgContext, View};

/// One drawn value of a gauge family.
#[derive(Debug, Clone, Copy)]
enum Point {
    Line(f64),
    Int(u64),
    /// Percentage bar capped at 100.
    Bar(f64),
    /// Percentage bar allowed past 100.
    Over(f64),
}

impl Point {
    fn value(self) -> f64 {
        match self {
            Point::Line(v) | Point::Bar(v) | Point::Over(v) => v,
            Point::Int(v) => v as f64,
        }
    }
}

/// Saves and draws `points` into consecutive slots from `first`.
fn plot<R: crate::record::StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    hdr: &RecordHeader,
    first: usize,
    points: &[Point],
) {
    let t = ctx.timetag(hdr);
    let (restart, dt) = (ctx.params.restart, ctx.params.dt);
    for (k, &p) in points.iter().enumerate() {
        data.state.extrema.save(0, first + k, p.value());
        let Some(s) = data.series.get_mut(first + k) else {
            continue;
        };
        draw_point(s, p, t, dt, restart);
    }
}

fn draw_point(s: &mut GraphSeries, p: Point, t: u64, dt: u64, restart: bool) {
    match p {
        Point::Line(v) => s.line_point(t, v, restart),
        Point::Int(v) => s.int_point(t, v, restart),
        Point::Bar(v) => s.bar(t, 0.0, v, dt, false),
        Point::Over(v) => s.bar(t, 0.0, v, dt, true),
    }
}

fn mb(kb: u64) -> f64 {
    kb as f64 / 1024.0
}

const RAM_AMOUNTS: [Metric; 3] = [
    Metric::float("MBmemfree"),
    Metric::float("MBavail"),
    Metric::float("MBmemused"),
];
const MEMUSED: [Metric; 1] = [Metric::float("%memused")];
const CACHES: [Metric; 4] = [
    Metric::float("MBbuffers"),
    Metric::float("MBcached"),
    Metric::float("MBshared"),
    Metric::float("MBcommit"),
];
const COMMIT: [Metric; 1] = [Metric::float("%commit")];
const LRU: [Metric; 3] = [
    Metric::float("MBactive"),
    Metric::float("MBinact"),
    Metric::float("MBdirty"),
];
const KERNEL: [Metric; 5] = [
    Metric::float("MBanonpg"),
    Metric::float("MBslab"),
    Metric::float("MBkstack"),
    Metric::float("MBpgtbl"),
    Metric::float("MBvmused"),
];
const SWAP_AMOUNTS: [Metric; 3] = [
    Metric::float("MBswpfree"),
    Metric::float("MBswpused"),
    Metric::float("MBswpcad"),
];
const SWPUSED: [Metric; 1] = [Metric::float("%swpused")];
const SWPCAD: [Metric; 1] = [Metric::float("%swpcad")];

/// Slot of the first swap metric, after the 17 RAM ones.
const SWAP_FIELD: usize = 17;

/// RAM then swap views of the same record. The kernel memory view is only
/// drawn with `mem_all`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryGraph;

impl GraphKind for MemoryGraph {
    type Record = MemoryStats;
    const ID: ActivityId = ActivityId::Memory;

    fn sample(
        &mut self,
        data: &mut GraphData<MemoryStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((m, _)) = data.single_pair() else {
            return;
        };
        let memused = m.tlmkb.saturating_sub(m.availablekb);
        let ram = [
            Point::Line(mb(m.frmkb)),
            Point::Line(mb(m.availablekb)),
            Point::Line(mb(memused)),
            Point::Bar(sp_value(m.availablekb, m.tlmkb, m.tlmkb)),
            Point::Line(mb(m.bufkb)),
            Point::Line(mb(m.camkb)),
            Point::Line(mb(m.shmemkb)),
            Point::Line(mb(m.comkb)),
            Point::Over(sp_value(0, m.comkb, m.tlmkb.saturating_add(m.tlskb))),
            Point::Line(mb(m.activekb)),
            Point::Line(mb(m.inactkb)),
            Point::Line(mb(m.dirtykb)),
            Point::Line(mb(m.anonpgkb)),
            Point::Line(mb(m.slabkb)),
            Point::Line(mb(m.kstackkb)),
            Point::Line(mb(m.pgtblkb)),
            Point::Line(mb(m.vmusedkb)),
        ];
        plot(data, ctx, hdr, 0, &ram);

        let swpused = m.tlskb.saturating_sub(m.frskb);
        let swap = [
            Point::Line(mb(m.frskb)),
            Point::Line(mb(swpused)),
            Point::Line(mb(m.caskb)),
            Point::Bar(sp_value(m.frskb, m.tlskb, m.tlskb)),
            Point::Bar(sp_value(0, m.caskb, swpused)),
        ];
        plot(data, ctx, hdr, SWAP_FIELD, &swap);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<MemoryStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let ram = [
            View::line("Memory utilization (1)", &RAM_AMOUNTS),
            View::bar("Memory utilization (2)", &MEMUSED),
            View::line("Memory utilization (3)", &CACHES),
            View::bar("Memory utilization (4)", &COMMIT),
            View::line("Memory utilization (5)", &LRU),
            View::line("Memory utilization (6)", &KERNEL),
        ];
        let shown = if ctx.opts.mem_all { ram.len() } else { ram.len() - 1 };
        let mut xid = 0;
        if data.draw_item(ctx, &ram[..shown], Slot::single(), hdr)? {
            xid += 1;
        }

        let swap = [
            View::line("Swap utilization (1)", &SWAP_AMOUNTS),
            View::bar("Swap utilization (2)", &SWPUSED),
            View::bar("Swap utilization (3)", &SWPCAD),
        ];
        let slot = Slot {
            xid,
            field: SWAP_FIELD,
            ..Slot::single()
        };
        data.draw_item(ctx, &swap, slot, hdr)?;
        Ok(())
    }
}

const HUGE_AMOUNTS: [Metric; 4] = [
    Metric::int("kbhugfree"),
    Metric::int("kbhugused"),
    Metric::int("kbhugrsvd"),
    Metric::int("kbhugsurp"),
];
const HUGUSED: [Metric; 1] = [Metric::float("%hugused")];

#[derive(Debug, Clone, Copy, Default)]
pub struct HugeGraph;

impl GraphKind for HugeGraph {
    type Record = HugeStats;
    const ID: ActivityId = ActivityId::Huge;

    fn sample(
        &mut self,
        data: &mut GraphData<HugeStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let Some((h, _)) = data.single_pair() else {
            return;
        };
        let points = [
            Point::Int(h.frhkb),
            Point::Int(h.tlhkb.saturating_sub(h.frhkb)),
            Point::Int(h.rsvdhkb),
            Point::Int(h.surphkb),
            Point::Bar(sp_value(h.frhkb, h.tlhkb, h.tlhkb)),
        ];
        plot(data, ctx, hdr, 0, &points);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<HugeStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Huge pages utilization (1)", &HUGE_AMOUNTS),
            View::bar("Huge pages utilization (2)", &HUGUSED),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}

const FILES: [Metric; 3] = [
    Metric::int("dentunusd"),
    Metric::int("file-nr"),
    Metric::int("inode-nr"),
];
const PTYS: [Metric; 1] = [Metric::int("pty-nr")];

#[derive(Debug, Clone, Copy, Default)]
pub struct KtablesGraph;

impl GraphKind for KtablesGraph {
    type Record = KtablesStats;
    const ID: ActivityId = ActivityId::Ktables;

    fn sample(
        &mut self,
        data: &mut GraphData<KtablesStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        sample_gauges(data, ctx, hdr);
    }

    fn finish(
        &mut self,
        data: &mut GraphData<KtablesStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Kernel tables statistics (1)", &FILES),
            View::line("Kernel tables statistics (2)", &PTYS),
        ];
        data.draw_item(ctx, &views, Slot::single(), hdr)?;
        Ok(())
    }
}
