//! Aggregate complaint counters shown on dashboards.

use serde::{Deserialize, Serialize};

/// Complaint counts by status.
///
/// `resolved + pending <= total`; equality holds only when no complaint is in
/// another status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComplaintStats {
    pub total: u64,
    pub resolved: u64,
    pub pending: u64,
}

impl ComplaintStats {
    /// Complaints in neither the resolved nor the pending state.
    pub fn other(&self) -> u64 {
        self.total.saturating_sub(self.resolved + self.pending)
    }
}
