//! Group completion: grading, pass/fail decisions and certificate issuance.

pub mod calc;
pub mod engine;
pub mod pg;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

pub use calc::AcademicSettings;
pub use engine::{check_eligibility, complete_active_group, complete_group};
pub use store::{CompletionStore, IssueContext, SystemIssueContext};
