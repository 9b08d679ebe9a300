//! Runtime state of one activity during a report.

use crate::activity::{Descriptor, ItemCount};
use crate::buffer::{ExtremaStore, SampleBuffer};
use crate::error::{Error, Result};
use crate::record::StatRecord;
use log::debug;
use std::collections::BTreeSet;

/// Which CPUs and which named items to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    cpus: CpuSelection,
    items: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CpuSelection {
    All,
    /// Bit 0 is CPU "all", bit n is CPU n-1.
    Bitmap(BTreeSet<usize>),
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            cpus: CpuSelection::Bitmap(BTreeSet::from([0])),
            items: None,
        }
    }
}

impl Selection {
    /// Parses `all`, or a comma list of CPU numbers and ranges (`0,2-3`).
    /// The literal `all` inside a list also selects the aggregate.
    pub fn with_cpus(mut self, list: &str) -> Result<Self> {
        let list = list.trim();
        if list.eq_ignore_ascii_case("all") {
            self.cpus = CpuSelection::All;
            return Ok(self);
        }
        let mut bits = BTreeSet::new();
        for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            if part.eq_ignore_ascii_case("all") || part == "-1" {
                bits.insert(0);
                continue;
            }
            let (lo, hi) = match part.split_once('-') {
                Some((a, b)) => (parse_cpu(a)?, parse_cpu(b)?),
                None => {
                    let n = parse_cpu(part)?;
                    (n, n)
                }
            };
            if lo > hi {
                return Err(Error::Selection(format!("invalid CPU range {part}")));
            }
            bits.extend((lo..=hi).map(|c| c + 1));
        }
        if bits.is_empty() {
            return Err(Error::Selection(format!("empty CPU list {list:?}")));
        }
        self.cpus = CpuSelection::Bitmap(bits);
        Ok(self)
    }

    pub fn with_items<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        self.items = if names.is_empty() { None } else { Some(names) };
        self
    }

    /// Whether CPU item `i` (0 = "all") is selected.
    pub fn cpu_selected(&self, i: usize) -> bool {
        match &self.cpus {
            CpuSelection::All => true,
            CpuSelection::Bitmap(bits) => bits.contains(&i),
        }
    }

    pub fn item_selected(&self, name: &str) -> bool {
        self.items
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == name))
    }
}

fn parse_cpu(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|_| Error::Selection(format!("invalid CPU number {s:?}")))
}

/// Buffers, extrema and resolved counts of one activity.
#[derive(Debug)]
pub struct ActivityState<R> {
    pub desc: &'static Descriptor,
    pub buffer: SampleBuffer<R>,
    pub extrema: ExtremaStore,
    pub nr_ini: usize,
    pub nr2: usize,
    /// Distinct items seen over the whole report.
    pub item_list_sz: usize,
}

impl<R: StatRecord> ActivityState<R> {
    pub fn new(desc: &'static Descriptor) -> Self {
        let nr_ini = desc.initial_items.fixed().unwrap_or(0);
        let nr2 = desc.secondary.fixed().unwrap_or(1);
        Self {
            desc,
            buffer: SampleBuffer::new(nr_ini),
            extrema: ExtremaStore::new(desc.xnr, nr_ini),
            nr_ini,
            nr2,
            item_list_sz: nr_ini,
        }
    }

    /// Sets the item count read from the system. Exceeding the
    /// descriptor's maximum is fatal.
    pub fn resolve_item_count(&mut self, count: usize) -> Result<()> {
        self.check(count)?;
        if let ItemCount::Fixed(n) = self.desc.initial_items
            && count != n
        {
            debug!(
                "[registry] {} has a fixed count of {n}, archive says {count}",
                self.desc.name
            );
        }
        self.nr_ini = count;
        self.ensure_capacity(count)
    }

    pub fn resolve_secondary(&mut self, count: usize) -> Result<()> {
        self.check(count)?;
        self.nr2 = count.max(1);
        Ok(())
    }

    /// Grows the sample buffer and extrema in lock-step. Idempotent.
    pub fn ensure_capacity(&mut self, observed: usize) -> Result<()> {
        self.check(observed)?;
        self.buffer.ensure_capacity(observed);
        self.extrema.ensure_items(observed);
        Ok(())
    }

    /// Sizes the per-item graph tables from a pre-scan of the report.
    pub fn set_item_list_size(&mut self, n: usize) -> Result<()> {
        self.check(n)?;
        self.item_list_sz = n;
        self.extrema.ensure_items(n);
        Ok(())
    }

    fn check(&self, count: usize) -> Result<()> {
        if count > self.desc.max_items {
            return Err(Error::ItemCountExceeded {
                activity: self.desc.name,
                count,
                max: self.desc.max_items,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{ActivityId, descriptor};
    use crate::record::{CpuStats, PcswStats};

    #[test]
    fn test_default_selection_is_cpu_all() {
        let sel = Selection::default();
        assert!(sel.cpu_selected(0));
        assert!(!sel.cpu_selected(1));
        assert!(sel.item_selected("sda"));
    }

    #[test]
    fn test_cpu_list() {
        let sel = Selection::default().with_cpus("0,2-3").unwrap();
        assert!(!sel.cpu_selected(0));
        assert!(sel.cpu_selected(1));
        assert!(!sel.cpu_selected(2));
        assert!(sel.cpu_selected(3));
        assert!(sel.cpu_selected(4));

        let sel = Selection::default().with_cpus("ALL").unwrap();
        assert!(sel.cpu_selected(4096));

        assert!(Selection::default().with_cpus("3-1").is_err());
        assert!(Selection::default().with_cpus("x").is_err());
    }

    #[test]
    fn test_item_filter() {
        let sel = Selection::default().with_items(["sda", "eth0"]);
        assert!(sel.item_selected("eth0"));
        assert!(!sel.item_selected("sdb"));
        let none = Selection::default().with_items(Vec::<String>::new());
        assert!(none.item_selected("anything"));
    }

    #[test]
    fn test_resolve_item_count_limit() {
        let mut st: ActivityState<CpuStats> = ActivityState::new(descriptor(ActivityId::Cpu));
        st.resolve_item_count(9).unwrap();
        assert_eq!(st.buffer.capacity(), 9);
        assert_eq!(st.extrema.items(), 9);

        let err = st.resolve_item_count(16386).unwrap_err();
        assert!(matches!(err, Error::ItemCountExceeded { max: 16385, .. }));
    }

    #[test]
    fn test_ensure_capacity_idempotent() {
        let mut st: ActivityState<PcswStats> = ActivityState::new(descriptor(ActivityId::Pcsw));
        assert_eq!(st.nr_ini, 1);
        st.ensure_capacity(1).unwrap();
        st.ensure_capacity(1).unwrap();
        assert_eq!(st.buffer.capacity(), 1);
        assert!(st.ensure_capacity(2).is_err());
    }
}
