//! Software-based network processing, one graph per selected CPU.

use super::{GraphData, GraphKind, Slot, plot_lines, slot_rates};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::buffer::save_extrema;
use crate::error::Result;
use crate::rate::aggregate_softnet;
use crate::record::SoftnetStats;
use crate::svg::{Metric, SvgContext, View};
use log::trace;

const PACKETS: [Metric; 2] = [Metric::float("total/s"), Metric::float("dropd/s")];
const STEERING: [Metric; 3] = [
    Metric::float("squeezd/s"),
    Metric::float("rx_rps/s"),
    Metric::float("flw_lim/s"),
];
const BACKLOG: [Metric; 1] = [Metric::int("blg_len")];

/// Counters drawn as rates; the backlog length comes after them.
const RATE_FIELDS: [usize; 5] = [0, 1, 2, 3, 4];
const BACKLOG_FIELD: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct SoftnetGraph;

impl GraphKind for SoftnetGraph {
    type Record = SoftnetStats;
    const ID: ActivityId = ActivityId::NetSoft;

    fn sample(
        &mut self,
        data: &mut GraphData<SoftnetStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let GraphData {
            state,
            series,
            selection,
        } = data;
        let xnr = state.desc.xnr;

        let (curr, prev) = state.buffer.generations_mut();
        state.nr_ini = state.nr_ini.max(curr.len());
        let offline = aggregate_softnet(curr, prev);
        let zero = SoftnetStats::default();
        let t = ctx.timetag(hdr);

        for (i, c) in curr.iter().enumerate() {
            if !selection.cpu_selected(i) {
                continue;
            }
            let Some(slots) = series.get_mut(i * xnr..(i + 1) * xnr) else {
                continue;
            };
            let p = prev.get(i).unwrap_or(&zero);

            // An offline CPU breaks its lines and keeps no extrema.
            let restart = if offline.get(i).copied().unwrap_or(false) {
                trace!("[render] softnet: CPU {} offline", i - 1);
                true
            } else {
                save_extrema(c, Some(p), itv, &mut state.extrema, i, &RATE_FIELDS);
                state.extrema.save(i, BACKLOG_FIELD, c.backlog_len as f64);
                ctx.params.restart
            };

            let values = slot_rates(c, p, itv, &RATE_FIELDS);
            plot_lines(slots, t, &values, restart);
            if let Some(s) = slots.get_mut(BACKLOG_FIELD) {
                s.int_point(t, c.backlog_len, restart);
            }
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<SoftnetStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Software-based network processing statistics (1)", &PACKETS),
            View::line("Software-based network processing statistics (2)", &STEERING),
            View::line("Software-based network processing statistics (3)", &BACKLOG),
        ];
        for i in 0..data.state.item_list_sz {
            if !data.selection.cpu_selected(i) {
                continue;
            }
            let name = if i == 0 {
                "all".to_string()
            } else {
                (i - 1).to_string()
            };
            // Group ids follow the CPU number, drawn or not.
            let slot = Slot {
                index: i,
                name: Some(&name),
                xid: i,
                skip_void: i != 0,
                field: 0,
            };
            data.draw_item(ctx, &views, slot, hdr)?;
        }
        Ok(())
    }
}
