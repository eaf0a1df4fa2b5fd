//! Outbound adapters implementing the driven ports.
//!
//! - **memory**: process-local tables and accounts for development and tests
//! - **supabase**: reqwest adapters for a Supabase-compatible BaaS
//!
//! Adapters translate between port types and their backend's wire format.
//! They contain no business logic.

pub mod memory;
pub mod supabase;
