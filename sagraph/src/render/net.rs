//! Network interfaces, interface errors and Fibre Channel hosts.

use super::{GraphData, GraphKind, draw_keyed, match_keyed, plot_lines, slot_rates};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::buffer::save_extrema;
use crate::error::Result;
use crate::rate::{if_util, s_value};
use crate::reconcile::EntitySlots;
use crate::record::{FcHostStats, NetDevStats, NetEdevStats};
use crate::svg::{Metric, SvgContext, View};

const PACKETS: [Metric; 2] = [Metric::float("rxpck/s"), Metric::float("txpck/s")];
const KBYTES: [Metric; 2] = [Metric::float("rxkB/s"), Metric::float("txkB/s")];
const COMPRESSED: [Metric; 3] = [
    Metric::float("rxcmp/s"),
    Metric::float("txcmp/s"),
    Metric::float("rxmcst/s"),
];
const IFUTIL: [Metric; 1] = [Metric::float("%ifutil")];

#[derive(Debug, Clone)]
pub struct NetDevGraph {
    slots: EntitySlots,
}

impl Default for NetDevGraph {
    fn default() -> Self {
        Self {
            slots: EntitySlots::new(0),
        }
    }
}

impl GraphKind for NetDevGraph {
    type Record = NetDevStats;
    const ID: ActivityId = ActivityId::NetDev;
    const KEYED: bool = true;

    fn begin(&mut self, data: &GraphData<NetDevStats>) {
        self.slots = EntitySlots::new(data.state.item_list_sz);
    }

    fn sample(
        &mut self,
        data: &mut GraphData<NetDevStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        const FIELDS: [usize; 7] = [0, 1, 2, 3, 4, 5, 6];
        let t = ctx.timetag(hdr);
        let dt = ctx.params.dt;
        for m in match_keyed(&mut self.slots, &data.state, &data.selection) {
            let restart = m.restart(ctx.params.restart);
            let (c, p) = (&m.curr, &m.prev);
            save_extrema(c, Some(p), itv, &mut data.state.extrema, m.slot, &FIELDS);

            let rx = s_value(p.rx_bytes, c.rx_bytes, itv);
            let tx = s_value(p.tx_bytes, c.tx_bytes, itv);
            let util = if_util(rx, tx, c.speed, c.duplex);
            data.state.extrema.save(m.slot, 7, util);

            let mut values = slot_rates(c, p, itv, &FIELDS);
            for kb in values.iter_mut().skip(2).take(2) {
                *kb /= 1024.0;
            }
            let series = data.item_series(m.slot);
            plot_lines(series, t, &values, restart);
            if let Some(s) = series.get_mut(7) {
                s.bar(t, 0.0, util, dt, false);
            }
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<NetDevStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        for i in 0..self.slots.len() {
            data.state.extrema.scale(i, 2, 1024.0);
            data.state.extrema.scale(i, 3, 1024.0);
        }
        let views = [
            View::line("Network interfaces statistics (1)", &PACKETS),
            View::line("Network interfaces statistics (2)", &KBYTES),
            View::line("Network interfaces statistics (3)", &COMPRESSED),
            View::bar("Network interfaces statistics (4)", &IFUTIL),
        ];
        draw_keyed(data, &self.slots, ctx, &views, hdr)
    }
}

const ERRORS: [Metric; 2] = [Metric::float("rxerr/s"), Metric::float("txerr/s")];
const DROPS: [Metric; 2] = [Metric::float("rxdrop/s"), Metric::float("txdrop/s")];
const FIFO: [Metric; 2] = [Metric::float("rxfifo/s"), Metric::float("txfifo/s")];
const LINK: [Metric; 3] = [
    Metric::float("coll/s"),
    Metric::float("txcarr/s"),
    Metric::float("rxfram/s"),
];

#[derive(Debug, Clone)]
pub struct NetEdevGraph {
    slots: EntitySlots,
}

impl Default for NetEdevGraph {
    fn default() -> Self {
        Self {
            slots: EntitySlots::new(0),
        }
    }
}

impl GraphKind for NetEdevGraph {
    type Record = NetEdevStats;
    const ID: ActivityId = ActivityId::NetEdev;
    const KEYED: bool = true;

    fn begin(&mut self, data: &GraphData<NetEdevStats>) {
        self.slots = EntitySlots::new(data.state.item_list_sz);
    }

    fn sample(
        &mut self,
        data: &mut GraphData<NetEdevStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        // Collisions are drawn with the link errors, after the FIFO errors.
        const FIELDS: [usize; 9] = [6, 0, 1, 2, 3, 4, 5, 8, 7];
        let t = ctx.timetag(hdr);
        for m in match_keyed(&mut self.slots, &data.state, &data.selection) {
            let restart = m.restart(ctx.params.restart);
            save_extrema(
                &m.curr,
                Some(&m.prev),
                itv,
                &mut data.state.extrema,
                m.slot,
                &FIELDS,
            );
            let values = slot_rates(&m.curr, &m.prev, itv, &FIELDS);
            plot_lines(data.item_series(m.slot), t, &values, restart);
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<NetEdevStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Network interfaces errors statistics (1)", &ERRORS),
            View::line("Network interfaces errors statistics (2)", &DROPS),
            View::line("Network interfaces errors statistics (3)", &FIFO),
            View::line("Network interfaces errors statistics (4)", &LINK),
        ];
        draw_keyed(data, &self.slots, ctx, &views, hdr)
    }
}

const FRAMES: [Metric; 2] = [Metric::float("fch_rxf/s"), Metric::float("fch_txf/s")];
const WORDS: [Metric; 2] = [Metric::float("fch_rxw/s"), Metric::float("fch_txw/s")];

#[derive(Debug, Clone)]
pub struct FcHostGraph {
    slots: EntitySlots,
}

impl Default for FcHostGraph {
    fn default() -> Self {
        Self {
            slots: EntitySlots::new(0),
        }
    }
}

impl GraphKind for FcHostGraph {
    type Record = FcHostStats;
    const ID: ActivityId = ActivityId::NetFc;
    const KEYED: bool = true;

    fn begin(&mut self, data: &GraphData<FcHostStats>) {
        self.slots = EntitySlots::new(data.state.item_list_sz);
    }

    fn sample(
        &mut self,
        data: &mut GraphData<FcHostStats>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) {
        const FIELDS: [usize; 4] = [0, 1, 2, 3];
        let t = ctx.timetag(hdr);
        for m in match_keyed(&mut self.slots, &data.state, &data.selection) {
            let restart = m.restart(ctx.params.restart);
            save_extrema(
                &m.curr,
                Some(&m.prev),
                itv,
                &mut data.state.extrema,
                m.slot,
                &FIELDS,
            );
            let values = slot_rates(&m.curr, &m.prev, itv, &FIELDS);
            plot_lines(data.item_series(m.slot), t, &values, restart);
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<FcHostStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Fibre Channel HBA statistics (1)", &FRAMES),
            View::line("Fibre Channel HBA statistics (2)", &WORDS),
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
    fn test_net_dev_kilobytes_and_util() {
        let mut g = Graph::new(NetDevGraph::default(), Selection::default());
        let samples = [
            json!([{"interface": "eth0", "speed": 1, "duplex": "half"}]),
            json!([{
                "interface": "eth0", "rx_packets": 80, "rx_bytes": 102400,
                "speed": 1, "duplex": "half"
            }]),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert_eq!(params.graph_no, 4);
        assert!(svg.contains("Network interfaces statistics (1) [eth0]"));
        assert!(svg.contains("rxpck/s (80.00, 80.00)"));
        assert!(svg.contains("rxkB/s (100.00, 100.00)"));
        assert!(svg.contains("d=\" M1,100.00\""));
        assert!(svg.contains("%ifutil (81.92, 81.92)"));
    }

    #[test]
    fn test_net_dev_unknown_speed_has_no_util_bar() {
        let mut g = Graph::new(NetDevGraph::default(), Selection::default());
        let samples = [
            json!([{"interface": "lo"}]),
            json!([{"interface": "lo", "tx_bytes": 2048}]),
        ];
        let (svg, _) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert!(svg.contains("txkB/s (2.00, 2.00)"));
        assert!(svg.contains("%ifutil (0.00, 0.00)"));
        assert!(!svg.contains("<rect x=\"0\" y=\"0.00\""));
    }

    #[test]
    fn test_net_edev_field_order() {
        let mut g = Graph::new(NetEdevGraph::default(), Selection::default());
        let samples = [
            json!([{"interface": "eth0"}]),
            json!([{
                "interface": "eth0", "collisions": 5, "rx_errors": 1,
                "rx_frame_errors": 2, "tx_carrier_errors": 3
            }]),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 1);
        assert_eq!(params.graph_no, 4);
        assert!(svg.contains("rxerr/s (1.00, 1.00)"));
        assert!(svg.contains("coll/s (5.00, 5.00)"));
        assert!(svg.contains("txcarr/s (3.00, 3.00)"));
        assert!(svg.contains("rxfram/s (2.00, 2.00)"));
    }

    #[test]
    fn test_fc_hosts() {
        let mut g = Graph::new(FcHostGraph::default(), Selection::default());
        let samples = [
            json!([{"name": "host0"}]),
            json!([{"name": "host0", "rx_frames": 30}, {"name": "host1"}]),
            json!([{"name": "host0", "rx_frames": 60}, {"name": "host1", "tx_words": 4}]),
        ];
        let (svg, params) = run(&mut g, &DisplayOptions::default(), &samples, 10);
        assert_eq!(params.graph_no, 4);
        assert!(svg.contains("Fibre Channel HBA statistics (2) [host1]"));
        assert!(svg.contains("fch_rxf/s (3.00, 3.00)"));
        assert!(svg.contains("<g id=\"g31-1\""));
        // host1 had no previous record at its first sample
        assert!(svg.contains("fch_txw/s (0.00, 0.40)"));
    }
}
