//! Server-side access policy for resource-mutating operations.
//!
//! An [`Actor`] is the authenticated account as recorded in the session at
//! login. Inbound adapters reject requests without a session (401) before
//! any of these checks run; the checks here only produce `forbidden` errors.

use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, DepartmentId, Error, Role};

/// The authenticated caller of a mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: AccountId,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
}

impl Actor {
    pub fn new(account_id: AccountId, role: Role, department_id: Option<DepartmentId>) -> Self {
        Self {
            account_id,
            role,
            department_id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Only admins may create departments.
    pub fn ensure_admin(&self) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden("admin role required"))
        }
    }

    /// Citizens file complaints in their own name; admins may file for anyone.
    pub fn ensure_may_submit_for(&self, owner: &AccountId) -> Result<(), Error> {
        if self.is_admin() || &self.account_id == owner {
            Ok(())
        } else {
            Err(Error::forbidden(
                "complaints may only be filed for the signed-in account",
            ))
        }
    }

    /// Status updates are reserved for officers and admins.
    pub fn ensure_staff(&self) -> Result<(), Error> {
        match self.role {
            Role::Officer | Role::Admin => Ok(()),
            Role::Citizen => Err(Error::forbidden("officer or admin role required")),
        }
    }

    /// Officers may only touch complaints routed to their own department.
    ///
    /// An officer without a department cannot update anything.
    pub fn ensure_may_update_department(&self, department_id: DepartmentId) -> Result<(), Error> {
        if self.is_admin() || self.department_id == Some(department_id) {
            Ok(())
        } else {
            Err(Error::forbidden("complaint belongs to another department"))
        }
    }

    /// The recorded updater is always the actor; a conflicting claim is refused.
    pub fn ensure_updater_claim(&self, claimed: Option<&AccountId>) -> Result<(), Error> {
        match claimed {
            Some(claimed) if claimed != &self.account_id => Err(Error::forbidden(
                "updated_by must match the signed-in account",
            )),
            _ => Ok(()),
        }
    }
}

/// Anyone may sign up as a citizen. Officer and admin accounts are created
/// by a signed-in admin.
pub fn ensure_may_register(actor: Option<&Actor>, role: Role) -> Result<(), Error> {
    match (role, actor) {
        (Role::Citizen, _) => Ok(()),
        (_, Some(actor)) if actor.is_admin() => Ok(()),
        _ => Err(Error::forbidden(
            "only an admin can create officer or admin accounts",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::{fixture, rstest};

    fn actor(role: Role, department: Option<i64>) -> Actor {
        Actor::new(
            AccountId::new(format!("{role}-1")).expect("id"),
            role,
            department.map(DepartmentId::new),
        )
    }

    #[fixture]
    fn officer() -> Actor {
        actor(Role::Officer, Some(2))
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Officer, false)]
    #[case(Role::Citizen, false)]
    fn only_admins_pass_admin_check(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(actor(role, None).ensure_admin().is_ok(), allowed);
    }

    #[rstest]
    #[case(Role::Admin, true)]
    #[case(Role::Officer, true)]
    #[case(Role::Citizen, false)]
    fn staff_check(#[case] role: Role, #[case] allowed: bool) {
        assert_eq!(actor(role, Some(1)).ensure_staff().is_ok(), allowed);
    }

    #[rstest]
    fn officer_is_confined_to_department(officer: Actor) {
        assert!(officer.ensure_may_update_department(DepartmentId::new(2)).is_ok());
        let err = officer
            .ensure_may_update_department(DepartmentId::new(3))
            .expect_err("other department");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    fn officer_without_department_cannot_update() {
        let officer = actor(Role::Officer, None);
        assert!(officer
            .ensure_may_update_department(DepartmentId::new(1))
            .is_err());
    }

    #[rstest]
    fn citizen_submits_only_for_self() {
        let citizen = actor(Role::Citizen, None);
        assert!(citizen.ensure_may_submit_for(&citizen.account_id.clone()).is_ok());
        let other = AccountId::new("someone-else").expect("id");
        assert!(citizen.ensure_may_submit_for(&other).is_err());
        assert!(actor(Role::Admin, None).ensure_may_submit_for(&other).is_ok());
    }

    #[rstest]
    #[case(Role::Citizen, None, true)]
    #[case(Role::Citizen, Some(Role::Officer), true)]
    #[case(Role::Officer, None, false)]
    #[case(Role::Admin, None, false)]
    #[case(Role::Admin, Some(Role::Citizen), false)]
    #[case(Role::Officer, Some(Role::Officer), false)]
    #[case(Role::Officer, Some(Role::Admin), true)]
    #[case(Role::Admin, Some(Role::Admin), true)]
    fn privileged_registration_needs_admin(
        #[case] requested: Role,
        #[case] session: Option<Role>,
        #[case] allowed: bool,
    ) {
        let caller = session.map(|role| actor(role, Some(1)));
        let outcome = ensure_may_register(caller.as_ref(), requested);
        assert_eq!(outcome.is_ok(), allowed);
        if let Err(err) = outcome {
            assert_eq!(err.code(), ErrorCode::Forbidden);
        }
    }

    #[rstest]
    fn conflicting_updater_claim_is_forbidden(officer: Actor) {
        let stranger = AccountId::new("stranger").expect("id");
        assert!(officer.ensure_updater_claim(None).is_ok());
        assert!(officer
            .ensure_updater_claim(Some(&officer.account_id.clone()))
            .is_ok());
        let err = officer
            .ensure_updater_claim(Some(&stranger))
            .expect_err("mismatch");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
