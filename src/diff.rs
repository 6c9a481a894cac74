use std::collections::HashSet;
use std::hash::Hash;

use crate::fetcher::{Slot, SlotId, Slots};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlotDiff {
    pub new_slots: Slots,
}

impl SlotDiff {
    pub const fn is_empty(&self) -> bool {
        self.new_slots.is_empty()
    }
}

/// Items of `current` whose key is absent from `previous`, in `current` order.
pub fn new_by_key<T, K, F>(previous: &[T], current: &[T], key: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let seen: HashSet<K> = previous.iter().map(&key).collect();
    current
        .iter()
        .filter(|&item| !seen.contains(&key(item)))
        .cloned()
        .collect()
}

fn slot_id(slot: &Slot) -> SlotId {
    slot.id.clone()
}

/// Slots that became available since the previous snapshot.
///
/// Only ids are compared: a known slot whose seat count changed is not new.
pub fn compute_diff(previous: &[Slot], current: &[Slot]) -> SlotDiff {
    SlotDiff {
        new_slots: new_by_key(previous, current, slot_id),
    }
}
