//! Which complaints a listing request may see.

use crate::domain::{AccountId, DepartmentId, Role};

/// Row filter applied when listing complaints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintScope {
    /// Every complaint.
    All,
    /// Complaints filed by one account.
    SubmittedBy(AccountId),
    /// Complaints routed to one department.
    Department(DepartmentId),
}

impl ComplaintScope {
    /// Resolve the scope from listing parameters.
    ///
    /// Citizens with an account id see their own complaints and officers with
    /// a department see that department's complaints. Every other
    /// combination, including an unknown role, sees everything.
    ///
    /// # Examples
    /// ```
    /// use civic_complaints::domain::{ComplaintScope, DepartmentId, Role};
    ///
    /// let scope = ComplaintScope::resolve(Some(Role::Officer), None, Some(DepartmentId::new(2)));
    /// assert_eq!(scope, ComplaintScope::Department(DepartmentId::new(2)));
    /// assert_eq!(ComplaintScope::resolve(Some(Role::Admin), None, None), ComplaintScope::All);
    /// ```
    pub fn resolve(
        role: Option<Role>,
        user_id: Option<AccountId>,
        department_id: Option<DepartmentId>,
    ) -> Self {
        match (role, user_id, department_id) {
            (Some(Role::Citizen), Some(user_id), _) => Self::SubmittedBy(user_id),
            (Some(Role::Officer), _, Some(department_id)) => Self::Department(department_id),
            _ => Self::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn user() -> Option<AccountId> {
        Some(AccountId::new("u-1").expect("id"))
    }

    #[rstest]
    fn citizen_with_user_is_scoped_to_user() {
        assert_eq!(
            ComplaintScope::resolve(Some(Role::Citizen), user(), Some(DepartmentId::new(1))),
            ComplaintScope::SubmittedBy(AccountId::new("u-1").expect("id"))
        );
    }

    #[rstest]
    #[case(Some(Role::Citizen), None, None)]
    #[case(Some(Role::Officer), Some("u-1"), None)]
    #[case(Some(Role::Admin), Some("u-1"), Some(3))]
    #[case(None, Some("u-1"), Some(3))]
    fn other_combinations_see_everything(
        #[case] role: Option<Role>,
        #[case] user_id: Option<&str>,
        #[case] department_id: Option<i64>,
    ) {
        let scope = ComplaintScope::resolve(
            role,
            user_id.map(|id| AccountId::new(id).expect("id")),
            department_id.map(DepartmentId::new),
        );
        assert_eq!(scope, ComplaintScope::All);
    }
}
