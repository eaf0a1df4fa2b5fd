//! Driving ports for the complaint resource.

use async_trait::async_trait;

use crate::domain::{
    Actor, ComplaintRecord, ComplaintScope, ComplaintStats, ComplaintView, Error, NewComplaint,
    StatusChange,
};

/// Mutations on complaints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintsCommand: Send + Sync {
    /// File a complaint. The stored status is always `Pending`.
    async fn submit(
        &self,
        actor: &Actor,
        complaint: NewComplaint,
    ) -> Result<Vec<ComplaintRecord>, Error>;

    /// Set a complaint's status, appending a history entry when a comment is
    /// supplied.
    ///
    /// # Errors
    ///
    /// - `forbidden` when the actor may not update this complaint.
    /// - `not_found` when an officer targets a missing complaint.
    async fn update_status(&self, actor: &Actor, change: StatusChange) -> Result<(), Error>;
}

/// Complaint listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintsQuery: Send + Sync {
    /// Complaints visible in `scope`, newest first, joined with department
    /// and submitter details.
    async fn list(&self, scope: ComplaintScope) -> Result<Vec<ComplaintView>, Error>;
}

/// Dashboard counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintStatsQuery: Send + Sync {
    async fn stats(&self) -> Result<ComplaintStats, Error>;
}
