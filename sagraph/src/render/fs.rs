//! Mounted filesystems: space in MiB, inodes in thousands.

use super::{GraphData, GraphKind, draw_keyed, match_keyed};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::rate::fs_usage;
use crate::reconcile::EntitySlots;
use crate::record::FilesystemStats;
use crate::svg::{Metric, SvgContext, View};

const MIB: f64 = 1024.0 * 1024.0;

const SPACE: [Metric; 2] = [Metric::int("MBfsfree"), Metric::int("MBfsused")];
const SPACE_PCT: [Metric; 2] = [Metric::float("%ufsused"), Metric::float("%fsused")];
const INODES: [Metric; 2] = [Metric::float("Ifree/1000"), Metric::float("Iused/1000")];
const INODES_PCT: [Metric; 1] = [Metric::float("%Iused")];

#[derive(Debug, Clone)]
pub struct FsGraph {
    slots: EntitySlots,
}

impl Default for FsGraph {
    fn default() -> Self {
        Self {
            slots: EntitySlots::new(0),
        }
    }
}

impl GraphKind for FsGraph {
    type Record = FilesystemStats;
    const ID: ActivityId = ActivityId::Fs;
    const KEYED: bool = true;

    fn begin(&mut self, data: &GraphData<FilesystemStats>) {
        self.slots = EntitySlots::new(data.state.item_list_sz);
    }

    fn sample(
        &mut self,
        data: &mut GraphData<FilesystemStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let t = ctx.timetag(hdr);
        let dt = ctx.params.dt;
        for m in match_keyed(&mut self.slots, &data.state, &data.selection) {
            // Usage figures are gauges: only a missing previous record breaks the line.
            let restart = ctx.params.restart || !m.prev_found;
            let fs = &m.curr;
            let usage = fs_usage(fs);
            let used = fs.f_blocks.saturating_sub(fs.f_bfree);
            let iused = fs.f_files.saturating_sub(fs.f_ffree);

            let extrema = [
                fs.f_bfree as f64,
                used as f64,
                usage.user_used_pct,
                usage.used_pct,
                fs.f_ffree as f64,
                iused as f64,
                usage.inodes_used_pct,
            ];
            for (k, &v) in extrema.iter().enumerate() {
                data.state.extrema.save(m.slot, k, v);
            }

            let [free_mb, used_mb, upct, pct, ifree, iused_k, ipct] = data.item_series(m.slot)
            else {
                continue;
            };
            free_mb.int_point(t, (fs.f_bfree as f64 / MIB) as u64, restart);
            used_mb.int_point(t, (used as f64 / MIB) as u64, restart);
            upct.bar(t, 0.0, usage.user_used_pct, dt, false);
            pct.bar(t, 0.0, usage.used_pct, dt, false);
            ifree.line_point(t, fs.f_ffree as f64 / 1000.0, restart);
            iused_k.line_point(t, iused as f64 / 1000.0, restart);
            ipct.bar(t, 0.0, usage.inodes_used_pct, dt, false);
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<FilesystemStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        for i in 0..self.slots.len() {
            let store = &mut data.state.extrema;
            store.scale(i, 0, MIB);
            store.scale(i, 1, MIB);
            store.scale(i, 4, 1000.0);
            store.scale(i, 5, 1000.0);
        }
        let views = [
            View::line("Filesystems statistics (1)", &SPACE),
            View::bar("Filesystems statistics (2)", &SPACE_PCT),
            View::line("Filesystems statistics (3)", &INODES),
            View::bar("Filesystems statistics (4)", &INODES_PCT),
        ];
        draw_keyed(data, &self.slots, ctx, &views, hdr)
    }
}
