//! Double-buffered sample storage and per-item extrema.

use crate::rate::s_value;
use crate::record::StatRecord;
use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    Current,
    Previous,
}

/// Two generations of item records for one activity.
///
/// Both generations always have the same allocated length. Growing keeps
/// whatever was already stored; the buffer never shrinks during a run.
#[derive(Debug, Clone)]
pub struct SampleBuffer<R> {
    gens: [Vec<R>; 2],
    nr: [usize; 2],
    curr: usize,
}

impl<R: Clone + Default> SampleBuffer<R> {
    pub fn new(capacity: usize) -> Self {
        Self {
            gens: [vec![R::default(); capacity], vec![R::default(); capacity]],
            nr: [0, 0],
            curr: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.gens[0].len()
    }

    /// Grows both generations to hold `n` items. Returns true if it grew.
    pub fn ensure_capacity(&mut self, n: usize) -> bool {
        if n <= self.capacity() {
            return false;
        }
        for slots in &mut self.gens {
            slots.resize(n, R::default());
        }
        true
    }

    /// Stores a freshly read sample into the current generation.
    pub fn load_current(&mut self, items: Vec<R>) {
        let n = items.len();
        self.ensure_capacity(n);
        let slots = &mut self.gens[self.curr];
        for (slot, item) in slots.iter_mut().zip(items) {
            *slot = item;
        }
        self.nr[self.curr] = n;
    }

    pub fn current(&self) -> &[R] {
        &self.gens[self.curr][..self.nr[self.curr]]
    }

    pub fn previous(&self) -> &[R] {
        let prev = self.curr ^ 1;
        &self.gens[prev][..self.nr[prev]]
    }

    /// Mutable views of both generations, current first.
    pub fn generations_mut(&mut self) -> (&mut [R], &mut [R]) {
        let (a, b) = self.gens.split_at_mut(1);
        let (curr, prev) = if self.curr == 0 {
            (&mut a[0], &mut b[0])
        } else {
            (&mut b[0], &mut a[0])
        };
        let (nc, np) = (self.nr[self.curr], self.nr[self.curr ^ 1]);
        (&mut curr[..nc], &mut prev[..np])
    }

    pub fn nr(&self, which: Generation) -> usize {
        match which {
            Generation::Current => self.nr[self.curr],
            Generation::Previous => self.nr[self.curr ^ 1],
        }
    }

    /// Makes the current sample the previous one.
    pub fn rotate(&mut self) {
        self.curr ^= 1;
    }

    /// Forgets the previous sample, e.g. after a restart marker.
    pub fn clear_previous(&mut self) {
        let prev = self.curr ^ 1;
        self.nr[prev] = 0;
    }
}

/// Running (min, max) of one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub min: f64,
    pub max: f64,
}

impl Extrema {
    pub const UNSET: Extrema = Extrema {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    pub fn save(&mut self, value: f64) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn is_unset(&self) -> bool {
        self.min == f64::INFINITY || self.max == f64::NEG_INFINITY
    }

    pub fn merge(&mut self, other: &Extrema) {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

impl Default for Extrema {
    fn default() -> Self {
        Extrema::UNSET
    }
}

/// Flat `items x xnr` table of extrema.
#[derive(Debug, Clone)]
pub struct ExtremaStore {
    xnr: usize,
    slots: Vec<Extrema>,
}

impl ExtremaStore {
    pub fn new(xnr: usize, items: usize) -> Self {
        Self {
            xnr,
            slots: vec![Extrema::UNSET; xnr * items],
        }
    }

    pub fn xnr(&self) -> usize {
        self.xnr
    }

    pub fn items(&self) -> usize {
        if self.xnr == 0 {
            0
        } else {
            self.slots.len() / self.xnr
        }
    }

    /// New slots start unset; existing ones are kept.
    pub fn ensure_items(&mut self, n: usize) {
        if n > self.items() {
            self.slots.resize(n * self.xnr, Extrema::UNSET);
        }
    }

    pub fn save(&mut self, item: usize, field: usize, value: f64) {
        if let Some(slot) = self.get_mut(item, field) {
            slot.save(value);
        }
    }

    pub fn get(&self, item: usize, field: usize) -> Extrema {
        if field >= self.xnr {
            return Extrema::UNSET;
        }
        self.slots
            .get(item * self.xnr + field)
            .copied()
            .unwrap_or(Extrema::UNSET)
    }

    pub fn item(&self, item: usize) -> &[Extrema] {
        let start = (item * self.xnr).min(self.slots.len());
        let end = (start + self.xnr).min(self.slots.len());
        &self.slots[start..end]
    }

    /// Divides a slot by `divisor` for display units. Unset slots keep
    /// their sentinels.
    pub fn scale(&mut self, item: usize, field: usize, divisor: f64) {
        if let Some(slot) = self.get_mut(item, field)
            && !slot.is_unset()
        {
            slot.min /= divisor;
            slot.max /= divisor;
        }
    }

    /// Global extrema over `fields` of one item.
    pub fn global(&self, item: usize, fields: Range<usize>) -> Extrema {
        let mut g = Extrema::UNSET;
        for f in fields {
            g.merge(&self.get(item, f));
        }
        g
    }

    pub fn get_mut(&mut self, item: usize, field: usize) -> Option<&mut Extrema> {
        if field >= self.xnr {
            return None;
        }
        self.slots.get_mut(item * self.xnr + field)
    }
}

/// Saves the extrema of every counter of `curr`.
///
/// Counter `i` lands in slot `g_fields[i]` of `item`. With a previous record
/// the value is a per-second rate, without one the raw counter (gauges).
pub fn save_extrema<R: StatRecord>(
    curr: &R,
    prev: Option<&R>,
    itv: u64,
    store: &mut ExtremaStore,
    item: usize,
    g_fields: &[usize],
) {
    for (i, &slot) in g_fields.iter().enumerate().take(R::COUNTERS) {
        let value = match prev {
            Some(p) => s_value(p.counter(i), curr.counter(i), itv),
            None => curr.counter(i) as f64,
        };
        store.save(item, slot, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IoStats, PcswStats};

    #[test]
    fn test_growth_preserves_contents() {
        let mut buf: SampleBuffer<u64> = SampleBuffer::new(2);
        buf.load_current(vec![1, 2]);
        buf.rotate();
        buf.load_current(vec![3, 4, 5]);
        assert_eq!(buf.capacity(), 3);
        assert_eq!(buf.previous(), &[1, 2]);
        assert_eq!(buf.current(), &[3, 4, 5]);
        assert!(!buf.ensure_capacity(2));
        assert!(buf.ensure_capacity(8));
        assert_eq!(buf.current(), &[3, 4, 5]);
        assert_eq!(buf.nr(Generation::Previous), 2);
    }

    #[test]
    fn test_rotate_and_clear() {
        let mut buf: SampleBuffer<u64> = SampleBuffer::new(1);
        buf.load_current(vec![7]);
        buf.rotate();
        buf.load_current(vec![9]);
        {
            let (curr, prev) = buf.generations_mut();
            curr[0] += prev[0];
        }
        assert_eq!(buf.current(), &[16]);
        buf.clear_previous();
        assert!(buf.previous().is_empty());
    }

    #[test]
    fn test_extrema_sentinels_and_bounds() {
        let mut store = ExtremaStore::new(2, 1);
        assert!(store.get(0, 0).is_unset());
        for v in [3.0, -1.5, 7.25, 0.0] {
            store.save(0, 0, v);
        }
        let e = store.get(0, 0);
        assert_eq!(e.min, -1.5);
        assert_eq!(e.max, 7.25);
        assert!(store.get(0, 1).is_unset());

        store.ensure_items(3);
        assert_eq!(store.items(), 3);
        assert_eq!(store.get(0, 0), e);
        assert!(store.get(2, 1).is_unset());
    }

    #[test]
    fn test_extrema_monotone_under_replay() {
        let mut store = ExtremaStore::new(1, 1);
        store.save(0, 0, 4.0);
        let before = store.get(0, 0);
        store.save(0, 0, 4.0);
        assert_eq!(store.get(0, 0), before);
    }

    #[test]
    fn test_scale_skips_unset() {
        let mut store = ExtremaStore::new(2, 1);
        store.save(0, 0, 2048.0);
        store.scale(0, 0, 1024.0);
        store.scale(0, 1, 1024.0);
        assert_eq!(store.get(0, 0).max, 2.0);
        assert!(store.get(0, 1).is_unset());
    }

    #[test]
    fn test_global_extrema() {
        let mut store = ExtremaStore::new(3, 1);
        store.save(0, 0, 1.0);
        store.save(0, 1, 10.0);
        store.save(0, 2, -2.0);
        let g = store.global(0, 0..2);
        assert_eq!((g.min, g.max), (1.0, 10.0));
        let g = store.global(0, 0..3);
        assert_eq!(g.min, -2.0);
    }

    #[test]
    fn test_save_extrema_maps_fields() {
        let prev = PcswStats {
            context_switch: 100,
            processes: 10,
        };
        let curr = PcswStats {
            context_switch: 300,
            processes: 15,
        };
        let mut store = ExtremaStore::new(2, 1);
        save_extrema(&curr, Some(&prev), 100, &mut store, 0, &[1, 0]);
        assert_eq!(store.get(0, 0).max, 5.0);
        assert_eq!(store.get(0, 1).max, 200.0);
    }

    #[test]
    fn test_save_extrema_gauges() {
        let curr = IoStats {
            dk_drive: 3,
            dk_drive_dio: 9,
            ..Default::default()
        };
        let mut store = ExtremaStore::new(7, 1);
        save_extrema(&curr, None, 100, &mut store, 0, &[0, 1, 2, 4, 5, 3, 6]);
        assert_eq!(store.get(0, 0).max, 3.0);
        assert_eq!(store.get(0, 3).max, 9.0);
    }
}
