//! Power management: CPU clock frequency, fans, temperature and voltage
//! sensors, batteries.
//!
//! Sensors are positional: item `i` is the `i`-th device of the archive,
//! named after the device reported by the latest sample.

use super::{GraphData, GraphKind, Slot};
use crate::activity::ActivityId;
use crate::archive::RecordHeader;
use crate::error::Result;
use crate::record::{BatStats, CpuFreqStats, FanStats, InStats, StatRecord, TempStats};
use crate::svg::{Metric, SvgContext, View};

/// Position of `value` within `[min, max]`, in percent. A flat range gives 0.
fn range_pct(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 {
        0.0
    } else {
        (value - min) / span * 100.0
    }
}

/// Keeps the display name of every item of the latest sample.
fn note_names(names: &mut Vec<String>, current: impl Iterator<Item = String>) {
    for (i, name) in current.enumerate() {
        match names.get_mut(i) {
            Some(n) => *n = name,
            None => names.push(name),
        }
    }
}

/// Draws every item slot under its noted name, numbering the drawn ones.
fn draw_named<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &mut SvgContext<'_>,
    views: &[View<'_>],
    names: &[String],
    hdr: &RecordHeader,
) -> Result<()> {
    let mut xid = 0;
    for i in 0..data.state.item_list_sz {
        let name = names.get(i).map(String::as_str).unwrap_or_default();
        if data.draw_item(ctx, views, Slot::named(i, name, xid), hdr)? {
            xid += 1;
        }
    }
    Ok(())
}

const MHZ: [Metric; 1] = [Metric::float("MHz")];

/// Step graph of each selected CPU's frequency. CPUs that never reported a
/// frequency were offline all along and are left out.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuFreqGraph;

impl GraphKind for CpuFreqGraph {
    type Record = CpuFreqStats;
    const ID: ActivityId = ActivityId::PwrCpu;

    fn sample(
        &mut self,
        data: &mut GraphData<CpuFreqStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let GraphData {
            state,
            series,
            selection,
        } = data;
        let xnr = state.desc.xnr;
        let t = ctx.timetag(hdr);
        let zero = CpuFreqStats::default();
        let prev = state.buffer.previous();

        // Offline CPUs are kept so the line drops to 0.
        for (i, c) in state.buffer.current().iter().enumerate() {
            if !selection.cpu_selected(i) {
                continue;
            }
            let p = prev.get(i).unwrap_or(&zero);
            let value = c.cpufreq as f64 / 100.0;
            state.extrema.save(i, 0, value);
            if let Some(s) = series.get_mut(i * xnr) {
                s.step(
                    t,
                    p.cpufreq as f64 / 100.0,
                    value,
                    ctx.params.dt,
                    ctx.params.restart,
                );
            }
        }
    }

    fn finish(
        &mut self,
        data: &mut GraphData<CpuFreqStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [View::line("CPU clock frequency", &MHZ)];
        let mut xid = 0;
        for i in 0..data.state.item_list_sz {
            if !data.selection.cpu_selected(i) {
                continue;
            }
            let name = if i == 0 {
                "all".to_string()
            } else {
                if data.state.extrema.get(i, 0).max == 0.0 {
                    continue;
                }
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

const RPM: [Metric; 1] = [Metric::int("rpm")];

#[derive(Debug, Clone, Default)]
pub struct FanGraph {
    names: Vec<String>,
}

impl GraphKind for FanGraph {
    type Record = FanStats;
    const ID: ActivityId = ActivityId::PwrFan;

    fn sample(
        &mut self,
        data: &mut GraphData<FanStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let GraphData { state, series, .. } = data;
        let xnr = state.desc.xnr;
        let t = ctx.timetag(hdr);
        let zero = FanStats::default();
        let prev = state.buffer.previous();
        let curr = state.buffer.current();

        for (i, c) in curr.iter().enumerate() {
            let p = prev.get(i).unwrap_or(&zero);
            state.extrema.save(i, 0, c.rpm);
            if let Some(s) = series.get_mut(i * xnr) {
                s.step(t, p.rpm, c.rpm, ctx.params.dt, ctx.params.restart);
            }
        }
        note_names(
            &mut self.names,
            curr.iter()
                .enumerate()
                .map(|(i, c)| format!("{}: {}", i + 1, c.device)),
        );
    }

    fn finish(
        &mut self,
        data: &mut GraphData<FanStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [View::line("Fans speed", &RPM)];
        draw_named(data, ctx, &views, &self.names, hdr)
    }
}

/// Value and percentage views of one ranged sensor family.
fn sample_ranged<R: StatRecord>(
    data: &mut GraphData<R>,
    ctx: &SvgContext<'_>,
    hdr: &RecordHeader,
    names: &mut Vec<String>,
    read: impl Fn(&R) -> (f64, f64, f64, &str),
) {
    let GraphData { state, series, .. } = data;
    let xnr = state.desc.xnr;
    let t = ctx.timetag(hdr);
    let curr = state.buffer.current();

    for (i, c) in curr.iter().enumerate() {
        let (value, min, max, _) = read(c);
        let pct = range_pct(value, min, max);
        state.extrema.save(i, 0, value);
        state.extrema.save(i, 1, pct);
        if let Some(s) = series.get_mut(i * xnr) {
            s.line_point(t, value, ctx.params.restart);
        }
        if let Some(s) = series.get_mut(i * xnr + 1) {
            s.bar(t, 0.0, pct, ctx.params.dt, false);
        }
    }
    note_names(
        names,
        curr.iter()
            .enumerate()
            .map(|(i, c)| format!("{}: {}", i + 1, read(c).3)),
    );
}

const DEGC: [Metric; 1] = [Metric::int("degC")];
const TEMP_PCT: [Metric; 1] = [Metric::float("%temp")];

#[derive(Debug, Clone, Default)]
pub struct TempGraph {
    names: Vec<String>,
}

impl GraphKind for TempGraph {
    type Record = TempStats;
    const ID: ActivityId = ActivityId::PwrTemp;

    fn sample(
        &mut self,
        data: &mut GraphData<TempStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        sample_ranged(data, ctx, hdr, &mut self.names, |s| {
            (s.temp, s.temp_min, s.temp_max, s.device.as_str())
        });
    }

    fn finish(
        &mut self,
        data: &mut GraphData<TempStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Devices temperature (1)", &DEGC),
            View::bar("Devices temperature (2)", &TEMP_PCT),
        ];
        draw_named(data, ctx, &views, &self.names, hdr)
    }
}

const VOLTS: [Metric; 1] = [Metric::float("inV")];
const IN_PCT: [Metric; 1] = [Metric::float("%in")];

#[derive(Debug, Clone, Default)]
pub struct InGraph {
    names: Vec<String>,
}

impl GraphKind for InGraph {
    type Record = InStats;
    const ID: ActivityId = ActivityId::PwrIn;

    fn sample(
        &mut self,
        data: &mut GraphData<InStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        sample_ranged(data, ctx, hdr, &mut self.names, |s| {
            (s.voltage, s.in_min, s.in_max, s.device.as_str())
        });
    }

    fn finish(
        &mut self,
        data: &mut GraphData<InStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [
            View::line("Voltage inputs statistics (1)", &VOLTS),
            View::bar("Voltage inputs statistics (2)", &IN_PCT),
        ];
        draw_named(data, ctx, &views, &self.names, hdr)
    }
}

const CAPACITY: [Metric; 1] = [Metric::int("%cap")];

#[derive(Debug, Clone, Default)]
pub struct BatGraph {
    names: Vec<String>,
}

impl GraphKind for BatGraph {
    type Record = BatStats;
    const ID: ActivityId = ActivityId::PwrBat;

    fn sample(
        &mut self,
        data: &mut GraphData<BatStats>,
        ctx: &SvgContext<'_>,
        _itv: u64,
        hdr: &RecordHeader,
    ) {
        let GraphData { state, series, .. } = data;
        let xnr = state.desc.xnr;
        let t = ctx.timetag(hdr);
        let curr = state.buffer.current();

        for (i, b) in curr.iter().enumerate() {
            let capacity = f64::from(b.capacity);
            state.extrema.save(i, 0, capacity);
            if let Some(s) = series.get_mut(i * xnr) {
                s.bar(t, 0.0, capacity, ctx.params.dt, false);
            }
        }
        note_names(
            &mut self.names,
            curr.iter().map(|b| format!("BAT{}", b.bat_id)),
        );
    }

    fn finish(
        &mut self,
        data: &mut GraphData<BatStats>,
        ctx: &mut SvgContext<'_>,
        hdr: &RecordHeader,
    ) -> Result<()> {
        let views = [View::bar("Batteries capacity", &CAPACITY)];
        draw_named(data, ctx, &views, &self.names, hdr)
    }
}
