//! Auth types shared across Pantry services.
//!
//! Token issuance and validation happen at the gateway; services only read
//! the identity it forwards.

pub mod identity;
