//! Supabase outbound adapters.
//!
//! [`SupabaseAuth`] implements the identity provider port against the GoTrue
//! auth API and [`SupabaseTables`] implements the table store port against
//! PostgREST. Both share one [`SupabaseClient`] carrying the project URL, API
//! key, and request timeout.

mod auth;
mod client;
mod dto;
mod rest;

pub use auth::SupabaseAuth;
pub use client::SupabaseClient;
pub use rest::SupabaseTables;
