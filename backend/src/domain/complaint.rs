//! Complaints, their status lifecycle, and the joined list view.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, DepartmentId};

/// Validation errors raised while building complaint commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintValidationError {
    EmptyTitle,
    EmptyDescription,
    UnknownStatus(String),
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::UnknownStatus(value) => write!(
                f,
                "status must be one of Pending, In Progress, Resolved, Rejected (got {value:?})"
            ),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Numeric complaint identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(i64);

impl ComplaintId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a complaint.
///
/// The wire spelling of [`ComplaintStatus::InProgress`] contains a space to
/// match rows written by earlier clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComplaintStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Rejected,
}

impl ComplaintStatus {
    /// Wire representation stored in the `status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ComplaintValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Pending" => Ok(Self::Pending),
            "In Progress" => Ok(Self::InProgress),
            "Resolved" => Ok(Self::Resolved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ComplaintValidationError::UnknownStatus(other.to_owned())),
        }
    }
}

/// A complaint as submitted by a citizen, before the store assigns an id.
///
/// New complaints always start as [`ComplaintStatus::Pending`]; there is no
/// way to supply a different initial status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComplaint {
    user_id: AccountId,
    department_id: DepartmentId,
    title: String,
    description: String,
}

impl NewComplaint {
    /// Validate and construct a new complaint.
    ///
    /// # Examples
    /// ```
    /// use civic_complaints::domain::{AccountId, DepartmentId, NewComplaint};
    ///
    /// let owner = AccountId::new("u-1").unwrap();
    /// let complaint =
    ///     NewComplaint::try_new(owner, DepartmentId::new(1), "Pothole", "Main St").unwrap();
    /// assert_eq!(complaint.title(), "Pothole");
    /// ```
    pub fn try_new(
        user_id: AccountId,
        department_id: DepartmentId,
        title: &str,
        description: &str,
    ) -> Result<Self, ComplaintValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ComplaintValidationError::EmptyTitle);
        }
        let description = description.trim();
        if description.is_empty() {
            return Err(ComplaintValidationError::EmptyDescription);
        }
        Ok(Self {
            user_id,
            department_id,
            title: title.to_owned(),
            description: description.to_owned(),
        })
    }

    pub fn user_id(&self) -> &AccountId {
        &self.user_id
    }

    pub fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> ComplaintStatus {
        ComplaintStatus::Pending
    }
}

/// Status change requested by an officer or admin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub complaint_id: ComplaintId,
    pub status: ComplaintStatus,
    /// History comment. Blank comments are normalised to `None`.
    pub comment: Option<String>,
    /// Updater id claimed by the client, checked against the session.
    pub claimed_updater: Option<AccountId>,
}

impl StatusChange {
    pub fn new(
        complaint_id: ComplaintId,
        status: ComplaintStatus,
        comment: Option<String>,
        claimed_updater: Option<AccountId>,
    ) -> Self {
        let comment = comment
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Self {
            complaint_id,
            status,
            comment,
            claimed_updater,
        }
    }
}

/// Embedded department summary in complaint listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentSummary {
    pub name: String,
}

/// Embedded submitter summary in complaint listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterSummary {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Complaint row joined with its department name and submitter profile.
///
/// `status` stays a raw string so rows written with values outside the
/// known set are still listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintView {
    pub id: ComplaintId,
    pub user_id: AccountId,
    pub department_id: DepartmentId,
    pub title: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "departments")]
    pub department: Option<DepartmentSummary>,
    #[serde(default, rename = "profiles")]
    pub submitter: Option<SubmitterSummary>,
}

/// Complaint row as returned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplaintRecord {
    pub id: ComplaintId,
    pub user_id: AccountId,
    pub department_id: DepartmentId,
    pub title: String,
    pub description: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn owner() -> AccountId {
        AccountId::new("u-1").expect("account id")
    }

    #[rstest]
    #[case("Pending", ComplaintStatus::Pending)]
    #[case("In Progress", ComplaintStatus::InProgress)]
    #[case("Resolved", ComplaintStatus::Resolved)]
    #[case("Rejected", ComplaintStatus::Rejected)]
    fn status_parses_wire_spellings(#[case] raw: &str, #[case] expected: ComplaintStatus) {
        let parsed: ComplaintStatus = raw.parse().expect("known status");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    #[case("pending")]
    #[case("Completed")]
    #[case("")]
    fn status_rejects_unknown_values(#[case] raw: &str) {
        assert!(matches!(
            raw.parse::<ComplaintStatus>(),
            Err(ComplaintValidationError::UnknownStatus(_))
        ));
    }

    #[rstest]
    fn status_serialises_with_space() {
        let value = serde_json::to_value(ComplaintStatus::InProgress).expect("json");
        assert_eq!(value, json!("In Progress"));
    }

    #[rstest]
    #[case("", "desc", ComplaintValidationError::EmptyTitle)]
    #[case("title", "  ", ComplaintValidationError::EmptyDescription)]
    fn new_complaint_requires_text(
        #[case] title: &str,
        #[case] description: &str,
        #[case] expected: ComplaintValidationError,
    ) {
        let err = NewComplaint::try_new(owner(), DepartmentId::new(1), title, description)
            .expect_err("blank text");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn new_complaint_is_always_pending() {
        let complaint =
            NewComplaint::try_new(owner(), DepartmentId::new(1), "Pothole", "Deep").expect("valid");
        assert_eq!(complaint.status(), ComplaintStatus::Pending);
    }

    #[rstest]
    fn status_change_drops_blank_comment() {
        let change = StatusChange::new(
            ComplaintId::new(7),
            ComplaintStatus::Resolved,
            Some("   ".to_owned()),
            None,
        );
        assert!(change.comment.is_none());
    }

    #[rstest]
    fn complaint_view_reads_joined_row() {
        let row = json!({
            "id": 101,
            "user_id": "u-1",
            "department_id": 1,
            "title": "Pothole",
            "description": "Deep",
            "status": "Pending",
            "created_at": "2023-10-27T10:00:00+00:00",
            "departments": {"name": "Roads"},
            "profiles": {"full_name": "Ada", "email": "a@x.com"}
        });
        let view: ComplaintView = serde_json::from_value(row).expect("joined row");
        assert_eq!(view.department.map(|d| d.name), Some("Roads".to_owned()));
        assert_eq!(
            view.submitter.and_then(|s| s.email),
            Some("a@x.com".to_owned())
        );
        assert!(view.created_at.is_some());
    }
}
