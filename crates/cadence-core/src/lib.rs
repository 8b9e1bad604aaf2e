//! Core types and derived-metric logic for the Cadence delivery dashboard.
//!
//! This crate has no HTTP, configuration, or randomness dependencies. The
//! generator, the live adapter, and the API server all depend on it.

pub mod aggregate;
pub mod derive;
pub mod error;
pub mod model;
pub mod query;
pub mod quarter;
pub mod source;
pub mod status;

pub use error::{Error, QuarterError, Result, ValidationError};
