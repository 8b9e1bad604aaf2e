//! Live delivery data from JIRA.
//!
//! Only the connection surface exists: [`JiraSource::new`] checks that every
//! credential is present, and each fetch reports which JIRA-to-model mapping
//! is still missing. Map your project structure in [`source`] to enable it.

pub mod error;
pub mod source;

pub use error::{Error, Result};
pub use source::{JiraConfig, JiraSource};
