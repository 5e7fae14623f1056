//! Cumulative per-link flap state.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use flapwatch_types::{FlapEvent, FlapRecord};

/// Mapping from link id to its cumulative [`FlapRecord`].
///
/// Records are only ever inserted or updated in place; nothing removes
/// them while the process runs. Iteration follows sorted link id order,
/// which keeps the persisted report deterministic.
#[derive(Debug, Default)]
pub struct FlapLedger {
    records: BTreeMap<String, FlapRecord>,
}

impl FlapLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of links tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any link has flapped yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record for a link.
    pub fn get(&self, link_id: &str) -> Option<&FlapRecord> {
        self.records.get(link_id)
    }

    /// All records in sorted link id order.
    pub fn records(&self) -> impl Iterator<Item = &FlapRecord> {
        self.records.values()
    }

    /// Apply one batch of flap events in input order.
    ///
    /// A first event for a link inserts a fresh record; every further
    /// event increments its counter and refreshes `last_occurred`.
    /// Multiple events for the same link within one batch each count as
    /// one flap.
    ///
    /// Returns the records that changed this cycle, one per touched
    /// link, carrying the state after the whole batch - the set the
    /// exporter pushes.
    pub fn apply(&mut self, events: &[FlapEvent]) -> Vec<FlapRecord> {
        let mut touched: Vec<String> = Vec::new();

        for event in events {
            match self.records.entry(event.link_id.clone()) {
                Entry::Occupied(mut occupied) => occupied.get_mut().observe(event),
                Entry::Vacant(vacant) => {
                    vacant.insert(FlapRecord::new(event));
                }
            }
            if !touched.iter().any(|id| id == &event.link_id) {
                touched.push(event.link_id.clone());
            }
        }

        touched
            .iter()
            .map(|id| self.records[id].clone())
            .collect()
    }
}
