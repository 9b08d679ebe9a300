//! Per-activity graph renderers.
//!
//! Each drawable family implements [`GraphKind`]: its record type, how one
//! sample turns into points and extrema, and how the views are laid out at
//! the end of the report. [`Graph`] wraps a kind with the shared plumbing
//! (payload decoding, double buffering, series allocation) and is handed to
//! the report driver as a [`GraphRenderer`] trait object.

mod cpu;
mod disk;
mod fs;
mod memory;
mod net;
mod power;
mod psi;
mod snmp;
mod softnet;
mod system;

pub use cpu::CpuGraph;
pub use disk::DiskGraph;
pub use fs::FsGraph;
pub use memory::{HugeGraph, KtablesGraph, MemoryGraph};
pub use net::{FcHostGraph, NetDevGraph, NetEdevGraph};
pub use power::{BatGraph, CpuFreqGraph, FanGraph, InGraph, TempGraph};
pub use psi::{PsiCpuGraph, PsiIoGraph, PsiMemGraph};
pub use snmp::{
    EicmpGraph, Eicmp6Graph, EipGraph, Eip6Graph, EtcpGraph, IcmpGraph, Icmp6Graph, IpGraph,
    Ip6Graph, NfsGraph, NfsdGraph, Sock6Graph, SockGraph, TcpGraph, UdpGraph, Udp6Graph,
};
pub use softnet::SoftnetGraph;
pub use system::{IoGraph, PagingGraph, PcswGraph, QueueGraph, SwapGraph};

use crate::activity::{ActivityId, Descriptor, Formats, catalogue, descriptor};
use crate::archive::{ActivityEntry, RecordHeader};
use crate::buffer::save_extrema;
use crate::error::{Error, Result};
use crate::rate::s_value;
use crate::reconcile::{EntitySlots, find_previous};
use crate::record::StatRecord;
use crate::registry::{ActivityState, Selection};
use crate::svg::{GraphSeries, GraphSet, SvgContext, View, draw_activity_graphs, graph_lines};
use log::{debug, trace};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;

/// Step of the three-pass rendering protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Allocate series for every item found by the pre-scan.
    Begin,
    /// Consume one sample against the previous one.
    Main,
    /// Emit the views and release the series.
    End,
}

pub trait GraphRenderer {
    fn descriptor(&self) -> &'static Descriptor;

    fn id(&self) -> ActivityId {
        self.descriptor().id
    }

    /// Applies the item counts announced by the archive header.
    fn resolve(&mut self, entry: &ActivityEntry) -> Result<()>;

    /// Notes the items of one sample during the pre-scan and returns how many
    /// were not seen before.
    fn count_new(&mut self, payload: &Value) -> Result<usize>;

    /// Stores a sample into the current generation.
    fn load(&mut self, payload: &Value) -> Result<()>;

    fn rotate(&mut self);

    /// Forgets the previous generation after a restart.
    fn clear_previous(&mut self);

    fn render(
        &mut self,
        phase: Phase,
        ctx: &mut SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) -> Result<()>;
}

/// Records, extrema and series of one activity.
#[derive(Debug)]
pub struct GraphData<R> {
    pub state: ActivityState<R>,
    /// `item_list_sz * xnr` series, one block of `xnr` per item slot.
    pub series: Vec<GraphSeries>,
    pub selection: Selection,
}

impl<R: StatRecord> GraphData<R> {
    fn xnr(&self) -> usize {
        self.state.desc.xnr
    }

    /// Series of item slot `item`.
    pub fn item_series(&mut self, item: usize) -> &mut [GraphSeries] {
        let xnr = self.xnr();
        let start = item * xnr;
        self.series
            .get_mut(start..start + xnr)
            .unwrap_or_default()
    }

    /// Current and previous record of a single-item family. A missing
    /// previous record reads as zero.
    pub fn single_pair(&self) -> Option<(R, R)> {
        let curr = self.state.buffer.current().first()?.clone();
        let prev = self
            .state
            .buffer
            .previous()
            .first()
            .cloned()
            .unwrap_or_default();
        Some((curr, prev))
    }

    /// Whether item slot `item` never got a point in its first series.
    pub fn is_void(&self, item: usize) -> bool {
        self.series
            .get(item * self.xnr())
            .is_none_or(GraphSeries::is_empty)
    }

    /// Draws the views of one item slot.
    pub fn draw_item(
        &mut self,
        ctx: &mut SvgContext<'_>,
        views: &[View<'_>],
        slot: Slot<'_>,
        hdr: &RecordHeader,
    ) -> Result<bool> {
        let xnr = self.xnr();
        let start = slot.index * xnr;
        let set = GraphSet {
            desc: self.state.desc,
            xid: slot.xid,
            item_name: slot.name,
            views,
            extrema: self
                .state
                .extrema
                .item(slot.index)
                .get(slot.field..)
                .unwrap_or_default(),
            series: self
                .series
                .get_mut(start + slot.field..start + xnr)
                .unwrap_or_default(),
            skip_void: slot.skip_void,
        };
        draw_activity_graphs(ctx, set, hdr)
    }
}

/// Item slot handed to [`GraphData::draw_item`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Slot<'a> {
    pub index: usize,
    pub name: Option<&'a str>,
    /// Number within the drawn items, part of the group id.
    pub xid: usize,
    /// Hide views whose first metric never got a value.
    pub skip_void: bool,
    /// First series and extrema slot of the views within the item block.
    pub field: usize,
}

impl<'a> Slot<'a> {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn named(index: usize, name: &'a str, xid: usize) -> Self {
        Self {
            index,
            name: Some(name),
            xid,
            skip_void: false,
            field: 0,
        }
    }
}

/// A current item bound to its graph slot, with the record it is compared
/// against.
#[derive(Debug, Clone)]
pub struct Matched<R> {
    pub slot: usize,
    /// The slot was freshly bound or its item had gone away.
    pub rebound: bool,
    /// The previous generation had an item of the same name.
    pub prev_found: bool,
    pub curr: R,
    /// Zero when `prev_found` is false.
    pub prev: R,
}

impl<R> Matched<R> {
    /// Whether the line of this item must break at this sample.
    pub fn restart(&self, global: bool) -> bool {
        global || self.rebound || !self.prev_found
    }
}

/// Binds every selected item of the current generation to a slot.
///
/// Items without a free slot are dropped with a debug log.
pub fn match_keyed<R: StatRecord>(
    slots: &mut EntitySlots,
    state: &ActivityState<R>,
    selection: &Selection,
) -> Vec<Matched<R>> {
    let prev = state.buffer.previous();
    let mut out = Vec::new();
    slots.begin_cycle();
    for (i, curr) in state.buffer.current().iter().enumerate() {
        let key = curr.key();
        if !selection.item_selected(key) {
            continue;
        }
        let Some(m) = slots.register(key) else {
            debug!("[render] {}: dropping {key}", state.desc.name);
            continue;
        };
        let found = find_previous(prev, i, R::key, key);
        out.push(Matched {
            slot: m.index,
            rebound: m.restart,
            prev_found: found.is_some(),
            curr: curr.clone(),
            prev: found.cloned().unwrap_or_default(),
        });
    }
    slots.end_cycle();
    out
}

/// Draws every slot that got at least one point, named after its item.
pub fn draw_keyed<R: StatRecord>(
    data: &mut GraphData<R>,
    slots: &EntitySlots,
    ctx: &mut SvgContext<'_>,
    views: &[View<'_>],
    hdr: &RecordHeader,
) -> Result<()> {
    let mut xid = 0;
    for i in 0..slots.len() {
        if data.is_void(i) {
            continue;
        }
        if data.draw_item(ctx, views, Slot::named(i, slots.key(i), xid), hdr)? {
            xid += 1;
        }
    }
    Ok(())
}

/// Per-second rates of every counter of `curr`, placed by `g_fields` the
/// same way [`save_extrema`](crate::buffer::save_extrema) places extrema.
pub fn slot_rates<R: StatRecord>(curr: &R, prev: &R, itv: u64, g_fields: &[usize]) -> Vec<f64> {
    let mut values = vec![0.0; g_fields.len()];
    for (i, &slot) in g_fields.iter().enumerate().take(R::COUNTERS) {
        if let Some(v) = values.get_mut(slot) {
            *v = s_value(prev.counter(i), curr.counter(i), itv);
        }
    }
    values
}

/// One line point per value, in series order.
pub fn plot_lines(series: &mut [GraphSeries], t: u64, values: &[f64], restart: bool) {
    for (s, &v) in series.iter_mut().zip(values) {
        s.line_point(t, v, restart);
    }
}

/// Line graphs of per-second rates of a single-item family, with extrema
/// placed by `g_fields`.
pub fn sample_rates<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    itv: u64,
    hdr: &RecordHeader,
    g_fields: &[usize],
) {
    let Some((curr, prev)) = data.single_pair() else {
        return;
    };
    save_extrema(&curr, Some(&prev), itv, &mut data.state.extrema, 0, g_fields);
    let values = slot_rates(&curr, &prev, itv, g_fields);
    plot_lines(
        data.item_series(0),
        ctx.timetag(hdr),
        &values,
        ctx.params.restart,
    );
}

/// Integer line graphs of the raw counters of a single-item family, in
/// record order.
pub fn sample_gauges<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    hdr: &RecordHeader,
) {
    let Some((curr, _)) = data.single_pair() else {
        return;
    };
    let fields: Vec<usize> = (0..R::COUNTERS).collect();
    save_extrema(&curr, None, 0, &mut data.state.extrema, 0, &fields);
    let t = ctx.timetag(hdr);
    let restart = ctx.params.restart;
    for (i, s) in data.item_series(0).iter_mut().enumerate().take(R::COUNTERS) {
        s.int_point(t, curr.counter(i), restart);
    }
}

/// Semantics of one statistic family.
pub trait GraphKind {
    type Record: StatRecord;
    const ID: ActivityId;
    /// Items are matched by name across samples instead of by position.
    const KEYED: bool = false;

    /// Called once the item list size is known, before the first sample.
    fn begin(&mut self, _data: &GraphData<Self::Record>) {}

    fn sample(
        &mut self,
        data: &mut GraphData<Self::Record>,
        ctx: &SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    );

    fn finish(
        &mut self,
        data: &mut GraphData<Self::Record>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()>;
}

/// A [`GraphKind`] with its buffers, usable as a [`GraphRenderer`].
#[derive(Debug)]
pub struct Graph<K: GraphKind> {
    kind: K,
    data: GraphData<K::Record>,
    /// Names found by the pre-scan of a keyed family.
    seen: BTreeSet<String>,
}

impl<K: GraphKind> Graph<K> {
    pub fn new(kind: K, selection: Selection) -> Self {
        Self {
            kind,
            data: GraphData {
                state: ActivityState::new(descriptor(K::ID)),
                series: Vec::new(),
                selection,
            },
            seen: BTreeSet::new(),
        }
    }

    pub fn data(&self) -> &GraphData<K::Record> {
        &self.data
    }

    fn decode(&self, payload: &Value) -> Result<Vec<K::Record>> {
        let mut items = decode_items::<K::Record>(payload).map_err(|source| Error::Decode {
            activity: self.data.state.desc.name,
            source,
        })?;
        if K::KEYED {
            items.retain(|r| !r.key().is_empty());
        }
        Ok(items)
    }
}

/// A payload is a list of item records; a lone object counts as one item.
fn decode_items<R: DeserializeOwned>(payload: &Value) -> serde_json::Result<Vec<R>> {
    match payload {
        Value::Array(_) => Vec::<R>::deserialize(payload),
        _ => R::deserialize(payload).map(|r| vec![r]),
    }
}

impl<K: GraphKind> GraphRenderer for Graph<K> {
    fn descriptor(&self) -> &'static Descriptor {
        self.data.state.desc
    }

    fn resolve(&mut self, entry: &ActivityEntry) -> Result<()> {
        self.data.state.resolve_item_count(entry.nr)?;
        self.data.state.resolve_secondary(entry.nr2)
    }

    fn count_new(&mut self, payload: &Value) -> Result<usize> {
        let items = self.decode(payload)?;
        let state = &mut self.data.state;
        let new = if K::KEYED {
            let before = self.seen.len();
            self.seen
                .extend(items.iter().map(|r| r.key().to_string()));
            self.seen.len() - before
        } else {
            items.len().saturating_sub(state.item_list_sz)
        };
        if new > 0 {
            let size = if K::KEYED {
                self.seen.len()
            } else {
                items.len()
            };
            state.set_item_list_size(size.max(state.item_list_sz))?;
        }
        Ok(new)
    }

    fn load(&mut self, payload: &Value) -> Result<()> {
        let items = self.decode(payload)?;
        self.data.state.ensure_capacity(items.len())?;
        self.data.state.buffer.load_current(items);
        Ok(())
    }

    fn rotate(&mut self) {
        self.data.state.buffer.rotate();
    }

    fn clear_previous(&mut self) {
        self.data.state.buffer.clear_previous();
    }

    fn render(
        &mut self,
        phase: Phase,
        ctx: &mut SvgContext<'_>,
        itv: u64,
        hdr: &RecordHeader,
    ) -> Result<()> {
        match phase {
            Phase::Begin => {
                let n = self.data.state.item_list_sz * self.data.xnr();
                trace!(
                    "[render] {}: {} items, {n} series",
                    self.data.state.desc.name, self.data.state.item_list_sz
                );
                self.data.series = graph_lines(n);
                self.kind.begin(&self.data);
            }
            Phase::Main => self.kind.sample(&mut self.data, ctx, itv, hdr),
            Phase::End => {
                let result = self.kind.finish(&mut self.data, ctx, hdr);
                self.data.series = Vec::new();
                result?;
            }
        }
        Ok(())
    }
}

/// Renderer for `id`, or `None` for families without graphs.
pub fn renderer_for(id: ActivityId, selection: &Selection) -> Option<Box<dyn GraphRenderer>> {
    let sel = selection.clone();
    let r: Box<dyn GraphRenderer> = match id {
        ActivityId::Cpu => Box::new(Graph::new(CpuGraph, sel)),
        ActivityId::Pcsw => Box::new(Graph::new(PcswGraph, sel)),
        ActivityId::Swap => Box::new(Graph::new(SwapGraph, sel)),
        ActivityId::Page => Box::new(Graph::new(PagingGraph, sel)),
        ActivityId::Io => Box::new(Graph::new(IoGraph, sel)),
        ActivityId::Memory => Box::new(Graph::new(MemoryGraph, sel)),
        ActivityId::Huge => Box::new(Graph::new(HugeGraph, sel)),
        ActivityId::Ktables => Box::new(Graph::new(KtablesGraph, sel)),
        ActivityId::Queue => Box::new(Graph::new(QueueGraph, sel)),
        ActivityId::Disk => Box::new(Graph::new(DiskGraph::default(), sel)),
        ActivityId::NetDev => Box::new(Graph::new(NetDevGraph::default(), sel)),
        ActivityId::NetEdev => Box::new(Graph::new(NetEdevGraph::default(), sel)),
        ActivityId::NetNfs => Box::new(Graph::new(NfsGraph, sel)),
        ActivityId::NetNfsd => Box::new(Graph::new(NfsdGraph, sel)),
        ActivityId::NetSock => Box::new(Graph::new(SockGraph, sel)),
        ActivityId::NetIp => Box::new(Graph::new(IpGraph, sel)),
        ActivityId::NetEip => Box::new(Graph::new(EipGraph, sel)),
        ActivityId::NetIcmp => Box::new(Graph::new(IcmpGraph, sel)),
        ActivityId::NetEicmp => Box::new(Graph::new(EicmpGraph, sel)),
        ActivityId::NetTcp => Box::new(Graph::new(TcpGraph, sel)),
        ActivityId::NetEtcp => Box::new(Graph::new(EtcpGraph, sel)),
        ActivityId::NetUdp => Box::new(Graph::new(UdpGraph, sel)),
        ActivityId::NetSock6 => Box::new(Graph::new(Sock6Graph, sel)),
        ActivityId::NetIp6 => Box::new(Graph::new(Ip6Graph, sel)),
        ActivityId::NetEip6 => Box::new(Graph::new(Eip6Graph, sel)),
        ActivityId::NetIcmp6 => Box::new(Graph::new(Icmp6Graph, sel)),
        ActivityId::NetEicmp6 => Box::new(Graph::new(Eicmp6Graph, sel)),
        ActivityId::NetUdp6 => Box::new(Graph::new(Udp6Graph, sel)),
        ActivityId::NetFc => Box::new(Graph::new(FcHostGraph::default(), sel)),
        ActivityId::NetSoft => Box::new(Graph::new(SoftnetGraph, sel)),
        ActivityId::PwrCpu => Box::new(Graph::new(CpuFreqGraph, sel)),
        ActivityId::PwrFan => Box::new(Graph::new(FanGraph::default(), sel)),
        ActivityId::PwrTemp => Box::new(Graph::new(TempGraph::default(), sel)),
        ActivityId::PwrIn => Box::new(Graph::new(InGraph::default(), sel)),
        ActivityId::PwrBat => Box::new(Graph::new(BatGraph::default(), sel)),
        ActivityId::Fs => Box::new(Graph::new(FsGraph::default(), sel)),
        ActivityId::PsiCpu => Box::new(Graph::new(PsiCpuGraph, sel)),
        ActivityId::PsiIo => Box::new(Graph::new(PsiIoGraph, sel)),
        ActivityId::PsiMem => Box::new(Graph::new(PsiMemGraph, sel)),
        _ => return None,
    };
    Some(r)
}

/// One renderer per drawable family, in catalogue order.
///
/// Families advertising SVG output without a renderer here are skipped.
pub fn registry(selection: &Selection) -> Vec<Box<dyn GraphRenderer>> {
    catalogue()
        .iter()
        .filter(|d| d.supports(Formats::SVG))
        .filter_map(|d| {
            let r = renderer_for(d.id, selection);
            if r.is_none() {
                debug!("[render] no graphs for {}", d.name);
            }
            r
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PcswStats;
    use serde_json::json;

    #[test]
    fn test_registry_covers_drawable_families() {
        let ids: Vec<_> = registry(&Selection::default())
            .iter()
            .map(|r| r.id())
            .collect();
        assert_eq!(ids.len(), 39);
        assert_eq!(ids.first(), Some(&ActivityId::Cpu));
        assert_eq!(ids.last(), Some(&ActivityId::PsiMem));
        assert!(ids.contains(&ActivityId::Memory));
        assert!(ids.contains(&ActivityId::NetSoft));
        // Every family advertising graphs has a renderer.
        let drawable = catalogue()
            .iter()
            .filter(|d| d.supports(Formats::SVG))
            .count();
        assert_eq!(ids.len(), drawable);
        for id in [ActivityId::Irq, ActivityId::Serial, ActivityId::PwrFreq, ActivityId::PwrUsb] {
            assert!(renderer_for(id, &Selection::default()).is_none());
        }
    }

    #[test]
    fn test_decode_single_object_or_list() {
        let one: Vec<PcswStats> = decode_items(&json!({"processes": 3})).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].processes, 3);
        let two: Vec<PcswStats> = decode_items(&json!([{}, {"context_switch": 9}])).unwrap();
        assert_eq!(two[1].context_switch, 9);
        assert!(decode_items::<PcswStats>(&json!("nope")).is_err());
    }

    #[test]
    fn test_decode_error_names_activity() {
        let mut g = Graph::new(PcswGraph, Selection::default());
        let err = g.load(&json!({"processes": "many"})).unwrap_err();
        assert!(err.to_string().starts_with("A_PCSW: cannot decode"));
    }

    #[test]
    fn test_count_new_keyed() {
        let mut g = Graph::new(DiskGraph::default(), Selection::default());
        assert_eq!(g.count_new(&json!([{"name": "sda"}, {"name": "sdb"}])).unwrap(), 2);
        assert_eq!(g.count_new(&json!([{"name": "sda"}, {"name": ""}])).unwrap(), 0);
        assert_eq!(g.count_new(&json!([{"name": "sdc"}])).unwrap(), 1);
        assert_eq!(g.data().state.item_list_sz, 3);
    }

    #[test]
    fn test_count_new_positional() {
        let mut g = Graph::new(CpuGraph, Selection::default());
        assert_eq!(g.count_new(&json!([{}, {}, {}])).unwrap(), 3);
        assert_eq!(g.count_new(&json!([{}, {}])).unwrap(), 0);
        assert_eq!(g.count_new(&json!([{}, {}, {}, {}, {}])).unwrap(), 2);
        assert_eq!(g.data().state.item_list_sz, 5);
    }

    #[test]
    fn test_count_new_over_limit_is_fatal() {
        let mut g = Graph::new(PcswGraph, Selection::default());
        assert!(matches!(
            g.count_new(&json!([{}, {}])),
            Err(Error::ItemCountExceeded { .. })
        ));
    }
}
