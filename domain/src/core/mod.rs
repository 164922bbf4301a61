//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`] — a validated question plus the acting user
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod query;
pub mod string;
