//! External integrations.
//!
//! The only adapter is the remote clinic-management API; see [`api`].

pub mod api;
