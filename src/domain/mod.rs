//! Domain models and types for Clinia.
//!
//! This module contains the core domain models, types, and business rules:
//!
//! - **Drafts** ([`PatientDraft`], [`ProductDraft`]): typed, request-scoped
//!   inputs to the workflows, with explicit optional fields instead of
//!   runtime map merging
//! - **Envelope types** ([`ApiEnvelope`], [`ApiResponse`]): the `{data, meta}`
//!   wrapper every remote response uses
//! - **Error types** ([`CliniaError`], [`ApiError`], [`WorkflowError`])
//! - **Outcome** ([`WorkflowResult`]): the consolidated result of a workflow
//! - **Result type alias** ([`Result`])
//!
//! All entities are created at the start of a single workflow invocation and
//! discarded at its end; nothing here persists across invocations.

pub mod envelope;
pub mod errors;
pub mod outcome;
pub mod patient;
pub mod product;
pub mod result;

pub use envelope::{authoritative_message, ApiEnvelope, ApiResponse, ApiVerb, EnvelopeMeta, EnvelopeStatus};
pub use errors::{ApiError, CliniaError, WorkflowError};
pub use outcome::WorkflowResult;
pub use patient::{PatientDraft, PROCEDENSE, VALID_GENDERS};
pub use product::{ProductDraft, ProductFlags, ProductType, CATEGORY_RANGE, UNIT_OF_MEASURE};
pub use result::Result;
