//! Workflow pipelines
//!
//! Exactly two fixed pipelines exist, each with sequential, non-branching
//! steps and no persistence beyond the single request lifecycle:
//!
//! - [`PatientRegistrationWorkflow`]: validate, check-exists, create, confirm
//! - [`ProductWorkflow`]: validate, create product, create variant
//!   (conditional, non-fatal), consolidate
//!
//! This is not a general workflow engine; steps are plain result-returning
//! functions and the only branching is the documented variant fast path.

pub mod patient;
pub mod product;

pub use patient::{validate_patient, PatientRegistrationWorkflow, MINIMUM_AGE};
pub use product::{validate_product, ProductWorkflow};
