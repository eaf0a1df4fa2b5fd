//! Complaint submission, listing, status updates, and dashboard counters.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::ports::{
    ComplaintStatsQuery, ComplaintsCommand, ComplaintsQuery, Filter, Table, TableQuery,
    TableStore,
};
use crate::domain::rows::{decode_rows, encode_row, map_store_error};
use crate::domain::{
    AccountId, Actor, ComplaintId, ComplaintRecord, ComplaintScope, ComplaintStats,
    ComplaintStatus, ComplaintView, DepartmentId, Error, NewComplaint, StatusChange,
};

#[derive(Serialize)]
struct ComplaintInsert<'a> {
    user_id: &'a AccountId,
    department_id: DepartmentId,
    title: &'a str,
    description: &'a str,
    status: ComplaintStatus,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: ComplaintStatus,
}

#[derive(Serialize)]
struct HistoryEntry<'a> {
    complaint_id: ComplaintId,
    updated_by: &'a AccountId,
    comment: &'a str,
    status: ComplaintStatus,
}

#[derive(Deserialize)]
struct ComplaintRouting {
    department_id: DepartmentId,
}

fn by_id(id: ComplaintId) -> Filter {
    Filter::eq("id", id.get())
}

/// Complaint service implementing the complaint command and query ports.
#[derive(Clone)]
pub struct ComplaintsService<S> {
    store: Arc<S>,
}

impl<S> ComplaintsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S> ComplaintsService<S>
where
    S: TableStore,
{
    async fn routing_of(&self, id: ComplaintId) -> Result<DepartmentId, Error> {
        let rows = self
            .store
            .select(&TableQuery::new(Table::Complaints).filter(by_id(id)))
            .await
            .map_err(map_store_error)?;
        decode_rows::<ComplaintRouting>(rows)?
            .into_iter()
            .next()
            .map(|routing| routing.department_id)
            .ok_or_else(|| Error::not_found(format!("complaint {id} not found")))
    }
}

#[async_trait]
impl<S> ComplaintsCommand for ComplaintsService<S>
where
    S: TableStore,
{
    async fn submit(
        &self,
        actor: &Actor,
        complaint: NewComplaint,
    ) -> Result<Vec<ComplaintRecord>, Error> {
        actor.ensure_may_submit_for(complaint.user_id())?;

        let row = encode_row(&ComplaintInsert {
            user_id: complaint.user_id(),
            department_id: complaint.department_id(),
            title: complaint.title(),
            description: complaint.description(),
            status: complaint.status(),
        })?;
        let rows = self
            .store
            .insert(Table::Complaints, row)
            .await
            .map_err(map_store_error)?;
        let records: Vec<ComplaintRecord> = decode_rows(rows)?;
        info!(
            user_id = %complaint.user_id(),
            department_id = %complaint.department_id(),
            "complaint registered"
        );
        Ok(records)
    }

    async fn update_status(&self, actor: &Actor, change: StatusChange) -> Result<(), Error> {
        actor.ensure_staff()?;
        actor.ensure_updater_claim(change.claimed_updater.as_ref())?;
        if !actor.is_admin() {
            let department_id = self.routing_of(change.complaint_id).await?;
            actor.ensure_may_update_department(department_id)?;
        }

        let changes = encode_row(&StatusUpdate {
            status: change.status,
        })?;
        let updated = self
            .store
            .update(Table::Complaints, changes, &[by_id(change.complaint_id)])
            .await
            .map_err(map_store_error)?;
        debug!(
            complaint_id = %change.complaint_id,
            rows = updated.len(),
            status = %change.status,
            "complaint status applied"
        );

        if let Some(comment) = change.comment.as_deref() {
            let entry = encode_row(&HistoryEntry {
                complaint_id: change.complaint_id,
                updated_by: &actor.account_id,
                comment,
                status: change.status,
            })?;
            self.store
                .insert(Table::ComplaintUpdates, entry)
                .await
                .map_err(map_store_error)?;
        }

        info!(
            complaint_id = %change.complaint_id,
            status = %change.status,
            by = %actor.account_id,
            "complaint updated"
        );
        Ok(())
    }
}

#[async_trait]
impl<S> ComplaintsQuery for ComplaintsService<S>
where
    S: TableStore,
{
    async fn list(&self, scope: ComplaintScope) -> Result<Vec<ComplaintView>, Error> {
        let mut query = TableQuery::new(Table::Complaints)
            .embed(Table::Departments, "department_id", &["name"])
            .embed(Table::Profiles, "user_id", &["full_name", "email"])
            .order_desc("created_at");
        query = match scope {
            ComplaintScope::All => query,
            ComplaintScope::SubmittedBy(user_id) => {
                query.filter(Filter::eq("user_id", String::from(user_id)))
            }
            ComplaintScope::Department(department_id) => {
                query.filter(Filter::eq("department_id", department_id.get()))
            }
        };

        let rows = self.store.select(&query).await.map_err(map_store_error)?;
        decode_rows(rows)
    }
}

/// Counter service backing the dashboard statistics.
#[derive(Clone)]
pub struct ComplaintStatsService<S> {
    store: Arc<S>,
}

impl<S> ComplaintStatsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> ComplaintStatsQuery for ComplaintStatsService<S>
where
    S: TableStore,
{
    async fn stats(&self) -> Result<ComplaintStats, Error> {
        let resolved = [Filter::eq("status", ComplaintStatus::Resolved.as_str())];
        let pending = [Filter::eq("status", ComplaintStatus::Pending.as_str())];
        let (total, resolved, pending) = futures_util::try_join!(
            self.store.count(Table::Complaints, &[]),
            self.store.count(Table::Complaints, &resolved),
            self.store.count(Table::Complaints, &pending),
        )
        .map_err(map_store_error)?;

        Ok(ComplaintStats {
            total,
            resolved,
            pending,
        })
    }
}

#[cfg(test)]
#[path = "complaints_service_tests.rs"]
mod tests;
