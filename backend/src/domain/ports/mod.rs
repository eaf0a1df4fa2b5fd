//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are implemented by domain services
//! and consumed by inbound adapters. Driven ports ([`IdentityProvider`],
//! [`TableStore`]) are implemented by outbound backends.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts_command;
mod complaints;
mod departments;
mod identity_provider;
mod table_store;

#[cfg(test)]
pub use accounts_command::MockAccountsCommand;
pub use accounts_command::AccountsCommand;
#[cfg(test)]
pub use complaints::{MockComplaintStatsQuery, MockComplaintsCommand, MockComplaintsQuery};
pub use complaints::{ComplaintStatsQuery, ComplaintsCommand, ComplaintsQuery};
#[cfg(test)]
pub use departments::{MockDepartmentsCommand, MockDepartmentsQuery};
pub use departments::{DepartmentsCommand, DepartmentsQuery};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError, SignInSession};
#[cfg(test)]
pub use table_store::MockTableStore;
pub use table_store::{Embed, Filter, Order, Row, Table, TableQuery, TableStore, TableStoreError};
