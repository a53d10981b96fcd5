//! Echo HTTP client
//!
//! Typed client for the Echo multi-tenant dashboard API: public
//! authentication endpoints plus a session-backed client that injects the
//! stored bearer credential and transparently renews it once when the
//! backend reports it expired.

pub mod client;
pub mod types;

pub use client::{AuthenticatedEchoClient, ClientBuilder, ClientError, PublicEchoClient};
