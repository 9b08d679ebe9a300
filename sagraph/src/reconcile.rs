//! Stable graph slots for items that come and go between samples.
//!
//! Disks, interfaces, FC hosts and filesystems are matched by name. A slot
//! keeps its name for the whole report once bound; a missing item only moves
//! its slot to [`Registration::Gone`] so the graph breaks when it comes back.

use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Never bound to an item.
    Unseen,
    Active,
    /// Active at the previous cycle, not seen yet in this one.
    PossiblyGone,
    Gone,
}

/// Where a current item goes and whether its graph must break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotMatch {
    pub index: usize,
    pub restart: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    key: String,
    state: Registration,
}

#[derive(Debug, Clone)]
pub struct EntitySlots {
    slots: Vec<Slot>,
}

impl EntitySlots {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![
                Slot {
                    key: String::new(),
                    state: Registration::Unseen,
                };
                size
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Marks every active slot as possibly gone.
    pub fn begin_cycle(&mut self) {
        for slot in &mut self.slots {
            if slot.state == Registration::Active {
                slot.state = Registration::PossiblyGone;
            }
        }
    }

    /// Binds `key` to its slot, or to the first free one.
    ///
    /// Returns `None` when every slot is taken by another key. `restart` is
    /// set when the slot is freshly bound or its item had gone away.
    pub fn register(&mut self, key: &str) -> Option<SlotMatch> {
        if key.is_empty() {
            return None;
        }
        let index = match self.slots.iter().position(|s| s.key == key) {
            Some(i) => i,
            None => {
                let Some(free) = self.slots.iter().position(|s| s.key.is_empty()) else {
                    debug!("[reconcile] no free slot for {key}");
                    return None;
                };
                self.slots[free].key = key.to_string();
                free
            }
        };

        let slot = &mut self.slots[index];
        let restart = matches!(slot.state, Registration::Unseen | Registration::Gone);
        slot.state = Registration::Active;
        Some(SlotMatch { index, restart })
    }

    /// Slots not seen during this cycle are now gone.
    pub fn end_cycle(&mut self) {
        for slot in &mut self.slots {
            if slot.state == Registration::PossiblyGone {
                slot.state = Registration::Gone;
            }
        }
    }

    /// Bound name of slot `i`; empty if never used.
    pub fn key(&self, i: usize) -> &str {
        self.slots.get(i).map(|s| s.key.as_str()).unwrap_or("")
    }

    pub fn state(&self, i: usize) -> Registration {
        self.slots
            .get(i)
            .map(|s| s.state)
            .unwrap_or(Registration::Unseen)
    }
}

/// Finds the previous-generation record named `key`.
///
/// The search starts at `hint` (the item's current position, clamped to the
/// previous generation) and wraps around, since items rarely move.
pub fn find_previous<'a, R>(
    prev: &'a [R],
    hint: usize,
    key_of: impl Fn(&R) -> &str,
    key: &str,
) -> Option<&'a R> {
    if prev.is_empty() {
        return None;
    }
    let start = hint.min(prev.len() - 1);
    (0..prev.len())
        .map(|off| &prev[(start + off) % prev.len()])
        .find(|r| key_of(r) == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle(slots: &mut EntitySlots, keys: &[&str]) -> Vec<Option<SlotMatch>> {
        slots.begin_cycle();
        let out = keys.iter().map(|k| slots.register(k)).collect();
        slots.end_cycle();
        out
    }

    #[test]
    fn test_add_and_remove_between_samples() {
        let mut slots = EntitySlots::new(4);
        let first = cycle(&mut slots, &["A", "B", "C"]);
        assert!(first.iter().all(|m| m.is_some_and(|m| m.restart)));

        let second = cycle(&mut slots, &["A", "C", "D"]);
        assert_eq!(second[0], Some(SlotMatch { index: 0, restart: false }));
        assert_eq!(second[1], Some(SlotMatch { index: 2, restart: false }));
        assert_eq!(second[2], Some(SlotMatch { index: 3, restart: true }));

        assert_eq!(slots.state(1), Registration::Gone);
        assert_eq!(slots.key(1), "B");
        assert_eq!(slots.state(3), Registration::Active);
    }

    #[test]
    fn test_slot_keeps_identity_while_absent() {
        let mut slots = EntitySlots::new(3);
        cycle(&mut slots, &["sda", "sdb"]);
        cycle(&mut slots, &["sda"]);
        cycle(&mut slots, &["sda", "sdc"]);
        assert_eq!(slots.key(1), "sdb");
        assert_eq!(slots.key(2), "sdc");

        let back = cycle(&mut slots, &["sdb"]);
        assert_eq!(back[0], Some(SlotMatch { index: 1, restart: true }));
    }

    #[test]
    fn test_full_slots_drop_item() {
        let mut slots = EntitySlots::new(1);
        let m = cycle(&mut slots, &["eth0", "eth1"]);
        assert!(m[0].is_some());
        assert!(m[1].is_none());
        assert_eq!(slots.state(5), Registration::Unseen);
        assert_eq!(slots.key(5), "");
    }

    #[test]
    fn test_possibly_gone_within_cycle() {
        let mut slots = EntitySlots::new(2);
        cycle(&mut slots, &["x"]);
        slots.begin_cycle();
        assert_eq!(slots.state(0), Registration::PossiblyGone);
        assert_eq!(slots.register("x"), Some(SlotMatch { index: 0, restart: false }));
    }

    #[test]
    fn test_find_previous_wraps() {
        let prev = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        fn key_of(s: &String) -> &str {
            s.as_str()
        }
        assert_eq!(find_previous(&prev, 2, key_of, "a"), Some(&prev[0]));
        assert_eq!(find_previous(&prev, 9, key_of, "b"), Some(&prev[1]));
        assert_eq!(find_previous(&prev, 0, key_of, "z"), None);
        assert_eq!(find_previous::<String>(&[], 0, key_of, "a"), None);
    }
}
