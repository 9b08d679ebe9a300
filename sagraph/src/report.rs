//! Drives every renderer over the records of an archive and assembles the
//! SVG document.

use crate::activity::{ActivityId, find_by_name};
use crate::archive::{Archive, Record, RecordHeader};
use crate::config::DisplayOptions;
use crate::error::{Error, Result};
use crate::registry::Selection;
use crate::render::{GraphRenderer, Phase, registry};
use crate::svg::clock::WallClock;
use crate::svg::{SvgContext, SvgParams, document};
use log::{debug, info};

const DAY_SECS: u64 = 86_400;

/// One SVG report over one archive.
#[derive(Debug)]
pub struct Report<'a> {
    archive: &'a Archive,
    opts: DisplayOptions,
    selection: Selection,
    /// Activities to draw; every drawable one when `None`.
    only: Option<Vec<ActivityId>>,
}

impl<'a> Report<'a> {
    pub fn new(archive: &'a Archive, opts: DisplayOptions, selection: Selection) -> Self {
        Self {
            archive,
            opts,
            selection,
            only: None,
        }
    }

    /// Restricts the report to the named activities (`A_DISK`, `disk`, ...).
    /// An empty list keeps every activity.
    pub fn with_activities<S: AsRef<str>>(mut self, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            self.only = None;
            return Ok(self);
        }
        let ids = names
            .iter()
            .map(|n| {
                find_by_name(n.as_ref())
                    .map(|d| d.id)
                    .ok_or_else(|| Error::UnknownActivity(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.only = Some(ids);
        Ok(self)
    }

    fn wanted(&self, id: ActivityId) -> bool {
        self.only.as_ref().is_none_or(|ids| ids.contains(&id))
    }

    /// Time axis and first sample of the report.
    fn params(&self, first: &RecordHeader, last: &RecordHeader) -> SvgParams {
        let (start, end, clock_ref) = if self.opts.one_day {
            let start = self.opts.time.day_start(first.ust_time, &self.archive.header);
            (start, start.saturating_add(DAY_SECS), WallClock::default())
        } else {
            (first.ust_time, last.ust_time, WallClock::from(first))
        };
        SvgParams {
            ust_time_ref: start,
            ust_time_end: end,
            ust_time_first: first.ust_time,
            clock_ref,
            ..Default::default()
        }
    }

    /// Processor count printed in the document header.
    fn cpu_count(&self) -> Option<usize> {
        let entry = self.archive.header.activity(ActivityId::Cpu.name())?;
        Some(if entry.nr > 1 { entry.nr - 1 } else { 1 })
    }

    pub fn render_svg(&self) -> Result<String> {
        let mut headers = self.archive.samples().map(Record::header);
        let first = headers.next().copied();
        let last = headers.last().copied().or(first);

        let params = match (first, last) {
            (Some(f), Some(l)) => self.params(&f, &l),
            _ => SvgParams::default(),
        };
        let mut ctx = SvgContext::new(&self.opts, &self.archive.header, params);

        if let (Some(first), Some(last)) = (first, last) {
            for mut renderer in registry(&self.selection) {
                let name = renderer.descriptor().name;
                if !self.wanted(renderer.id()) || !self.archive.has_activity(name) {
                    continue;
                }
                debug!("[report] drawing {name}");
                self.draw(renderer.as_mut(), &mut ctx, &first, &last)?;
            }
        } else {
            info!("[report] archive has no samples");
        }

        debug!(
            "[report] {} rows, {} views per row at most",
            ctx.params.graph_no, ctx.params.max_views
        );
        document::finish(ctx, self.cpu_count())
    }

    fn draw(
        &self,
        renderer: &mut dyn GraphRenderer,
        ctx: &mut SvgContext<'_>,
        first: &RecordHeader,
        last: &RecordHeader,
    ) -> Result<()> {
        let name = renderer.descriptor().name;
        if let Some(entry) = self.archive.header.activity(name) {
            renderer.resolve(entry)?;
        }
        for record in self.archive.samples() {
            if let Record::Stats { activities, .. } = record
                && let Some(payload) = activities.get(name)
            {
                renderer.count_new(payload)?;
            }
        }

        renderer.render(Phase::Begin, ctx, 0, first)?;
        ctx.params.restart = false;
        let mut baseline: Option<RecordHeader> = None;

        for record in &self.archive.records {
            match record {
                Record::Restart { header } => {
                    debug!("[report] {name}: restart at {}", header.ust_time);
                    ctx.params.restart = true;
                    renderer.clear_previous();
                    baseline = None;
                }
                Record::Comment { .. } => {}
                Record::Stats { header, activities } => {
                    let Some(payload) = activities.get(name) else {
                        continue;
                    };
                    renderer.load(payload)?;
                    if let Some(prev) = baseline {
                        ctx.params.dt = header.ust_time.saturating_sub(prev.ust_time);
                        renderer.render(Phase::Main, ctx, interval(&prev, header), header)?;
                        ctx.params.restart = false;
                    }
                    renderer.rotate();
                    baseline = Some(*header);
                }
            }
        }

        renderer.render(Phase::End, ctx, 0, last)
    }
}

/// Hundredths of a second between two samples: from uptime when both have
/// it, from wall clock otherwise.
pub fn interval(prev: &RecordHeader, curr: &RecordHeader) -> u64 {
    if prev.uptime_cs > 0 && curr.uptime_cs > prev.uptime_cs {
        curr.uptime_cs - prev.uptime_cs
    } else {
        curr.ust_time.saturating_sub(prev.ust_time).saturating_mul(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{ActivityEntry, FileHeader};
    use crate::config::TimeBasis;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    const T0: u64 = 1_700_000_000;

    fn file(activities: &[(&str, usize)]) -> FileHeader {
        FileHeader {
            nodename: "web3".into(),
            sysname: "Linux".into(),
            release: "6.8.0".into(),
            machine: "x86_64".into(),
            ust_time: T0,
            activities: activities
                .iter()
                .map(|(name, nr)| ActivityEntry {
                    name: name.to_string(),
                    nr: *nr,
                    nr2: 1,
                })
                .collect(),
            ..Default::default()
        }
    }

    fn stats(t: u64, payloads: &[(&str, Value)]) -> Record {
        Record::Stats {
            header: RecordHeader::new(T0 + t, 0, 0),
            activities: payloads
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn pcsw(procs: u64) -> (&'static str, Value) {
        ("A_PCSW", json!({"processes": procs}))
    }

    #[test]
    fn test_interval_prefers_uptime() {
        let a = RecordHeader::new(T0, 1000, 0);
        let b = RecordHeader::new(T0 + 10, 1950, 0);
        assert_eq!(interval(&a, &b), 950);
        let c = RecordHeader::new(T0 + 10, 0, 0);
        assert_eq!(interval(&a, &c), 1000);
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive {
            header: file(&[("A_CPU", 5)]),
            records: vec![],
        };
        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        assert!(svg.contains("No data!"));
        assert!(svg.contains("(4 CPU)"));
    }

    #[test]
    fn test_single_sample_has_no_data() {
        let archive = Archive {
            header: file(&[]),
            records: vec![stats(0, &[pcsw(10)])],
        };
        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        assert!(svg.contains(">No data</text>"));
        assert!(!svg.contains("CPU)"));
    }

    #[test]
    fn test_restart_starts_new_baseline() {
        let archive = Archive {
            header: file(&[("A_PCSW", 1)]),
            records: vec![
                stats(0, &[pcsw(0)]),
                stats(10, &[pcsw(100)]),
                Record::Restart {
                    header: RecordHeader::new(T0 + 15, 0, 0),
                },
                stats(20, &[pcsw(5)]),
                stats(30, &[pcsw(25)]),
            ],
        };
        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        // The sample right after the restart is only a baseline.
        assert!(svg.contains("d=\" M10,10.00 M30,2.00\""));
        assert!(svg.contains("proc/s (2.00, 10.00)"));
    }

    #[test]
    fn test_activity_filter_and_order() {
        let swap = ("A_SWAP", json!({"pswpin": 0}));
        let archive = Archive {
            header: file(&[]),
            records: vec![
                stats(0, &[pcsw(0), swap.clone()]),
                stats(60, &[pcsw(60), ("A_SWAP", json!({"pswpin": 60}))]),
            ],
        };
        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        let pcsw_at = svg.find("Task creation").unwrap();
        let swap_at = svg.find("Swap activity").unwrap();
        assert!(pcsw_at < swap_at);

        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .with_activities(&["swap"])
            .unwrap()
            .render_svg()
            .unwrap();
        assert!(!svg.contains("Task creation"));
        assert!(svg.contains("pswpin/s (1.00, 1.00)"));

        let err = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .with_activities(&["A_NOPE"])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownActivity(_)));
    }

    #[test]
    fn test_missing_payload_skips_sample() {
        let archive = Archive {
            header: file(&[]),
            records: vec![
                stats(0, &[pcsw(0)]),
                stats(10, &[]),
                stats(20, &[pcsw(40)]),
            ],
        };
        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        assert!(svg.contains("d=\" M20,2.00\""));
    }

    #[test]
    fn test_one_day_axis() {
        let archive = Archive {
            header: file(&[]),
            records: vec![stats(0, &[pcsw(0)]), stats(3600, &[pcsw(3600)])],
        };
        let opts = DisplayOptions {
            one_day: true,
            ..Default::default()
        };
        let svg = Report::new(&archive, opts, Selection::default())
            .render_svg()
            .unwrap();
        // T0 is 22:13:20 UTC, so the axis starts 80000 seconds earlier.
        assert!(svg.contains("d=\" M83600,1.00\""));
        assert!(svg.contains(">22:00</text>"));
    }

    #[test]
    fn test_true_time_labels_follow_recorded_clock() {
        let recorded = |t: u64, procs: u64| Record::Stats {
            header: RecordHeader::new(T0 + t, 0, 19_800),
            activities: [pcsw(procs)]
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        };
        let archive = Archive {
            header: file(&[]),
            records: vec![recorded(0, 0), recorded(600, 600)],
        };
        let opts = DisplayOptions {
            time: TimeBasis::True,
            ..Default::default()
        };
        let svg = Report::new(&archive, opts, Selection::default())
            .render_svg()
            .unwrap();
        // The file header carries no offset; the records were taken at +05:30.
        assert!(svg.contains(">03:43:20</text>"));
        assert!(svg.contains(">03:44:20</text>"));
        assert!(!svg.contains(">22:13:20</text>"));

        let svg = Report::new(&archive, DisplayOptions::default(), Selection::default())
            .render_svg()
            .unwrap();
        assert!(svg.contains(">22:13:20</text>"));
    }
}
