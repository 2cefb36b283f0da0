//! HTTP API module for the control plane.
//!
//! # Purpose
//! Groups REST handlers, shared error helpers, and OpenAPI types.
//!
//! # Notes
//! Business handlers run behind the security gate and only read the
//! [`Caller`](crate::gate::Caller) and access request it inserted.
pub mod access;
pub mod error;
pub mod openapi;
pub mod system;
pub mod types;
pub mod users;
