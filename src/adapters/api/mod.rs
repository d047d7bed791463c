//! Remote clinic-management API adapter
//!
//! The [`ApiTransport`] trait is the seam between the workflows and the wire:
//! workflows hold an `Arc<dyn ApiTransport>` and never see `reqwest` types.
//! [`HttpApiClient`] is the production implementation; tests substitute a
//! recording mock.

pub mod client;
pub mod transport;

pub use client::HttpApiClient;
pub use transport::{endpoints, ApiTransport};
