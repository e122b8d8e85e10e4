//! HTTP server for Go tournament registration.
//!
//! The binary wires configuration, logging and a storage backend together and
//! serves the [`api`] router. The pieces are exposed here so the integration
//! tests can build the same router over an in-memory store.

pub mod api;
pub mod config;
pub mod logging;
