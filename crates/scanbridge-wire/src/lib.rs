//! Binary formats spoken by the daemon.
//!
//! - [`rpc`]: typed views of the batched block-fetch request and response, carried in the
//!   portable-storage container.
//! - [`blob`]: block and transaction blobs carried inside those responses.

pub mod blob;
mod error;
pub mod rpc;

pub use error::WireError;
