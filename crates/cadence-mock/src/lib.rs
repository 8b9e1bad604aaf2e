//! Deterministic synthetic delivery data.
//!
//! Six authored programs anchor everything; milestones, risks, and weekly
//! metrics are expanded from fixed plans with a seeded RNG. Escalations are
//! authored outright.

mod catalogue;
mod generate;
mod source;

pub use catalogue::{escalations, programs};
pub use generate::{DEFAULT_SEED, generate_metrics, generate_milestones, generate_risks};
pub use source::MockSource;
