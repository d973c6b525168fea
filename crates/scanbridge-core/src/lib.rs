//! Scanbridge base primitives and schemas.

/// Fixed-width key and hash types shared across crates.
pub mod base;
/// Serialized request/response envelopes.
pub mod schema;
