//! Core business logic
//!
//! The classifier turns transport failures into user-facing guidance, the
//! workflows implement the two multi-step pipelines, and the operation
//! dispatcher routes named requests to pipelines or single-call endpoints.

pub mod classifier;
pub mod operations;
pub mod workflows;

pub use classifier::{classify, ClassifiedError, ErrorCategory, Recoverability};
pub use operations::{Operation, OperationDispatcher, OperationRequest};
pub use workflows::{PatientRegistrationWorkflow, ProductWorkflow};
