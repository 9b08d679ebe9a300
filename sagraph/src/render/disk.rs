//! Block devices, one set of graphs per device name.

use super::{GraphData, GraphKind, draw_keyed, match_keyed, plot_lines};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::rate::{ext_disk_stats, s_value};
use crate::reconcile::EntitySlots;
use crate::record::DiskStats;
use crate::svg::{Metric, SvgContext, View};

const TPS: [Metric; 1] = [Metric::float("tps")];
const THROUGHPUT: [Metric; 3] = [
    Metric::float("rkB/s"),
    Metric::float("wkB/s"),
    Metric::float("dkB/s"),
];
const QUEUE: [Metric; 2] = [Metric::float("areq-sz"), Metric::float("aqu-sz")];
const AWAIT: [Metric; 1] = [Metric::float("await")];
const UTIL: [Metric; 1] = [Metric::float("%util")];

#[derive(Debug, Clone)]
pub struct DiskGraph {
    slots: EntitySlots,
}

impl Default for DiskGraph {
    fn default() -> Self {
        Self {
            slots: EntitySlots::new(0),
        }
    }
}

impl GraphKind for DiskGraph {
    type Record = DiskStats;
    const ID: ActivityId = ActivityId::Disk;
    const KEYED: bool = true;

    fn begin(&mut self, data: &GraphData<DiskStats>) {
        self.slots = EntitySlots::new(data.state.item_list_sz);
    }

    fn sample(
        &mut self,
        data: &mut GraphData<DiskStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        let t = ctx.timetag(hdr);
        let dt = ctx.params.dt;
        for m in match_keyed(&mut self.slots, &data.state, &data.selection) {
            let restart = m.restart(ctx.params.restart);
            let (c, p) = (&m.curr, &m.prev);
            let ext = ext_disk_stats(c, p, itv);
            // Sectors are 512 bytes.
            let values = [
                s_value(p.nr_ios, c.nr_ios, itv),
                s_value(p.rd_sect, c.rd_sect, itv) / 2.0,
                s_value(p.wr_sect, c.wr_sect, itv) / 2.0,
                s_value(p.dc_sect, c.dc_sect, itv) / 2.0,
                ext.arqsz / 2.0,
                s_value(p.rq_ticks, c.rq_ticks, itv) / 1000.0,
                ext.await_ms,
                ext.util / 10.0,
            ];
            for (k, &v) in values.iter().enumerate() {
                data.state.extrema.save(m.slot, k, v);
            }

            let series = data.item_series(m.slot);
            let (lines, util) = values.split_at(7);
            plot_lines(series, t, lines, restart);
            if let (Some(s), Some(&u)) = (series.get_mut(7), util.first()) {
                s.bar(t, 0.0, u, dt, false);
            }
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<DiskStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Block devices statistics (1)", &TPS),
            View::line("Block devices statistics (2)", &THROUGHPUT),
            View::line("Block devices statistics (3)", &QUEUE),
            View::line("Block devices statistics (4)", &AWAIT),
            View::bar("Block devices statistics (5)", &UTIL),
        ];
        draw_keyed(data, &self.slots, ctx, &views, hdr)
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
    fn test_disk_metrics() {
        let mut g = Graph::new(DiskGraph::default(), Selection::default());
        let samples = [
            json!([{"name": "sda"}]),
            json!([{
                "name": "sda", "nr_ios": 10, "rd_sect": 200, "wr_sect": 100,
                "rd_ticks": 30, "wr_ticks": 20, "tot_ticks": 500, "rq_ticks": 2000
            }]),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert_eq!(params.graph_no, 5);
        assert!(svg.contains("Block devices statistics (2) [sda]"));
        assert!(svg.contains("tps (10.00, 10.00)"));
        assert!(svg.contains("rkB/s (100.00, 100.00)"));
        assert!(svg.contains("wkB/s (50.00, 50.00)"));
        assert!(svg.contains("areq-sz (15.00, 15.00)"));
        assert!(svg.contains("aqu-sz (2.00, 2.00)"));
        assert!(svg.contains("await (5.00, 5.00)"));
        assert!(svg.contains("%util (50.00, 50.00)"));
        assert!(svg.contains("<rect x=\"0\" y=\"0.00\" height=\"50.00\" width=\"1\"/>"));
    }

    #[test]
    fn test_disk_returning_breaks_line() {
        let mut g = Graph::new(DiskGraph::default(), Selection::default());
        let samples = [
            json!([{"name": "sda"}, {"name": "sdb"}]),
            json!([{"name": "sda", "nr_ios": 10}, {"name": "sdb"}]),
            json!([{"name": "sdb"}]),
            json!([{"name": "sdb"}, {"name": "sda", "nr_ios": 15}]),
        ];
        let (svg, _) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert!(svg.contains("d=\" M1,10.00 M3,15.00\""));
        // sdb kept its slot and line
        assert!(svg.contains("d=\" M1,0.00 L2,0.00 L3,0.00\""));
        assert!(svg.contains("<g id=\"g12-1\""));
    }

    #[test]
    fn test_disk_filter() {
        let sel = Selection::default().with_items(["sdb"]);
        let mut g = Graph::new(DiskGraph::default(), sel);
        let samples = [
            json!([{"name": "sda"}, {"name": "sdb"}]),
            json!([{"name": "sda", "nr_ios": 5}, {"name": "sdb", "nr_ios": 7}]),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert_eq!(params.graph_no, 5);
        assert!(svg.contains("[sdb]"));
        assert!(!svg.contains("[sda]"));
        assert!(svg.contains("<g id=\"g12-0\""));
    }
}
