//! Flap events and the cumulative per-link flap record.

/// One link whose counters increased between two snapshots.
///
/// Events are produced by the snapshot diff and consumed once per
/// comparison cycle; they are not retained after the cycle that folds
/// them into the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlapEvent {
    /// Stable identifier of the link.
    pub link_id: String,
    /// Description of the node on this side of the link.
    pub node_description: String,
    /// Description of the node on the far side of the link.
    pub partner_node_description: String,
    /// Estimated occurrence time, formatted `%Y-%m-%d %H:%M:%S`.
    pub estimated_time: String,
}

/// Cumulative flap state for a single link.
///
/// Created on the first observed flap and updated in place on every
/// subsequent one; records are never removed while the process runs.
/// Field order here fixes the column order of the CSV report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlapRecord {
    pub link_id: String,
    pub node_description: String,
    pub partner_node_description: String,
    /// Time of the first observed flap; never changes after creation.
    pub first_occurred: String,
    /// Time of the most recent observed flap.
    pub last_occurred: String,
    /// Total flaps observed for this link; only ever grows.
    pub flap_count: u64,
}

impl FlapRecord {
    /// Column names of the CSV report, in field order.
    pub const CSV_HEADER: [&'static str; 6] = [
        "link_id",
        "node_description",
        "partner_node_description",
        "first_occurred",
        "last_occurred",
        "flap_count",
    ];

    /// Create the record for a link's first observed flap.
    pub fn new(event: &FlapEvent) -> Self {
        Self {
            link_id: event.link_id.clone(),
            node_description: event.node_description.clone(),
            partner_node_description: event.partner_node_description.clone(),
            first_occurred: event.estimated_time.clone(),
            last_occurred: event.estimated_time.clone(),
            flap_count: 1,
        }
    }

    /// Fold another observation of the same link into the record.
    ///
    /// `flap_count` increments unconditionally and `first_occurred` is
    /// never touched. `last_occurred` takes the later of the two times;
    /// the `%Y-%m-%d %H:%M:%S` format orders lexicographically, so a
    /// plain string comparison is chronological and an out-of-order
    /// event can never move it backward.
    pub fn observe(&mut self, event: &FlapEvent) {
        self.flap_count += 1;
        if event.estimated_time > self.last_occurred {
            self.last_occurred = event.estimated_time.clone();
        }
    }
}
