//! Remote priority-classification client.
//!
//! Delegates task classification to an external HTTP service with a
//! hard client-side timeout and a closed failure taxonomy. Every
//! failure is reported as a [`ClassificationFailure`] value; nothing
//! in this crate panics or propagates a transport error past its
//! boundary.

/// HTTP client for the classification endpoint.
pub mod client;
/// Failure taxonomy for classification attempts.
pub mod failure;

pub use client::RemoteClassifier;
pub use failure::ClassificationFailure;
