//! Serialized schema/data contracts.

/// Request envelopes accepted by the scan and offline entry points.
pub mod request;
/// Result envelopes emitted by the scan and offline entry points.
pub mod response;
