//! Control-plane service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, the security gate, configuration, and the record
//! store for use by the binary and tests.
//!
//! # Notes
//! Authorization decisions live in `mesh-authz`; this crate adapts them to
//! HTTP and supplies the records they are computed from.
pub mod api;
pub mod app;
pub mod config;
pub mod gate;
pub mod observability;
pub mod store;
