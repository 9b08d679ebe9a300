//! CPU utilization as stacked bars, one graph per selected CPU.

use super::{GraphData, GraphKind, Slot};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::buffer::ExtremaStore;
use crate::error::Result;
use crate::rate::{CpuAggregate, aggregate_cpus, cpu_interval, ll_sp_value};
use crate::record::CpuStats;
use crate::svg::{GraphSeries, Metric, SvgContext, View};
use log::trace;

const DEFAULT_FIELDS: [Metric; 6] = [
    Metric::float("%user"),
    Metric::float("%nice"),
    Metric::float("%system"),
    Metric::float("%iowait"),
    Metric::float("%steal"),
    Metric::float("%idle"),
];

const ALL_FIELDS: [Metric; 10] = [
    Metric::float("%usr"),
    Metric::float("%nice"),
    Metric::float("%sys"),
    Metric::float("%iowait"),
    Metric::float("%steal"),
    Metric::float("%irq"),
    Metric::float("%soft"),
    Metric::float("%guest"),
    Metric::float("%gnice"),
    Metric::float("%idle"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct CpuGraph;

/// Bars of one CPU for one sample, stacked from 0.
struct Stack<'a> {
    item: usize,
    t: u64,
    dt: u64,
    offset: f64,
    series: &'a mut [GraphSeries],
    extrema: &'a mut ExtremaStore,
}

impl Stack<'_> {
    fn push(&mut self, k: usize, value: f64) {
        if let (Some(s), Some(e)) = (self.series.get_mut(k), self.extrema.get_mut(self.item, k)) {
            s.cpu_bar(self.t, &mut self.offset, value, self.dt, e);
        }
    }
}

impl GraphKind for CpuGraph {
    type Record = CpuStats;
    const ID: ActivityId = ActivityId::Cpu;

    fn sample(
        &mut self,
        data: &mut GraphData<CpuStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let all_fields = ctx.opts.cpu_all_fields;
        let idle = if all_fields { 9 } else { 5 };
        let GraphData {
            state,
            series,
            selection,
        } = data;
        let xnr = state.desc.xnr;

        let (curr, prev) = state.buffer.generations_mut();
        state.nr_ini = state.nr_ini.max(curr.len());
        let agg = if curr.len() > 1 {
            aggregate_cpus(curr, prev)
        } else {
            CpuAggregate::default()
        };
        let zero = CpuStats::default();

        for (i, c) in curr.iter().enumerate() {
            if !selection.cpu_selected(i) || agg.offline.get(i).copied().unwrap_or(false) {
                continue;
            }
            let Some(slots) = series.get_mut(i * xnr..(i + 1) * xnr) else {
                continue;
            };
            let p = prev.get(i).unwrap_or(&zero);
            let mut stack = Stack {
                item: i,
                t: ctx.timetag(hdr),
                dt: ctx.params.dt,
                offset: 0.0,
                series: slots,
                extrema: &mut state.extrema,
            };

            let deltot = if i == 0 {
                // CPU "all" cannot be tickless.
                let d = if curr.len() == 1 {
                    cpu_interval(c, p)
                } else {
                    agg.interval
                };
                d.max(1)
            } else {
                let d = cpu_interval(c, p);
                if d == 0 {
                    trace!("[render] CPU {} tickless", i - 1);
                    for k in 0..idle {
                        stack.extrema.save(i, k, 0.0);
                    }
                    stack.push(idle, 100.0);
                    continue;
                }
                d
            };

            if all_fields {
                stack.push(
                    0,
                    ll_sp_value(
                        p.user.saturating_sub(p.guest),
                        c.user.saturating_sub(c.guest),
                        deltot,
                    ),
                );
                stack.push(
                    1,
                    ll_sp_value(
                        p.nice.saturating_sub(p.guest_nice),
                        c.nice.saturating_sub(c.guest_nice),
                        deltot,
                    ),
                );
                stack.push(2, ll_sp_value(p.sys, c.sys, deltot));
            } else {
                stack.push(0, ll_sp_value(p.user, c.user, deltot));
                stack.push(1, ll_sp_value(p.nice, c.nice, deltot));
                stack.push(
                    2,
                    ll_sp_value(
                        p.sys.wrapping_add(p.hardirq).wrapping_add(p.softirq),
                        c.sys.wrapping_add(c.hardirq).wrapping_add(c.softirq),
                        deltot,
                    ),
                );
            }
            stack.push(3, ll_sp_value(p.iowait, c.iowait, deltot));
            stack.push(4, ll_sp_value(p.steal, c.steal, deltot));
            if all_fields {
                stack.push(5, ll_sp_value(p.hardirq, c.hardirq, deltot));
                stack.push(6, ll_sp_value(p.softirq, c.softirq, deltot));
                stack.push(7, ll_sp_value(p.guest, c.guest, deltot));
                stack.push(8, ll_sp_value(p.guest_nice, c.guest_nice, deltot));
            }
            stack.push(idle, ll_sp_value(p.idle, c.idle, deltot));
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<CpuStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let fields: &[Metric] = if ctx.opts.cpu_all_fields {
            &ALL_FIELDS
        } else {
            &DEFAULT_FIELDS
        };
        // %idle is last and only drawn on request
        let shown = if ctx.opts.show_idle {
            fields.len()
        } else {
            fields.len() - 1
        };
        let views = [View::bar("CPU utilization", &fields[..shown])];

        let mut xid = 0;
        for i in 0..data.state.item_list_sz {
            if !data.selection.cpu_selected(i) {
                continue;
            }
            let name = if i == 0 {
                "all".to_string()
            } else {
                (i - 1).to_string()
            };
            let slot = Slot {
                index: i,
                name: Some(&name),
                xid,
                skip_void: i != 0,
                field: 0,
            };
            if data.draw_item(ctx, &views, slot, hdr)? {
                xid += 1;
            }
        }
        Ok(())
    }
}
