//! Application-level configuration.
//!
//! - [`RunParams`] — step budget, timeouts and retry policies of a run

pub mod run_params;

pub use run_params::RunParams;
