//! `landacq-core`: shared building blocks.
//!
//! Typed identifiers for the records the client navigates between (projects,
//! plans, lots, token subjects) and the error model used when they are parsed.

pub mod error;
pub mod id;

pub use error::DomainError;
pub use id::{LotId, PlanId, ProjectId, SubjectId};
