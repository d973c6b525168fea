//! Wire decoding errors

use thiserror::Error;

/// Errors raised while decoding or encoding daemon wire data
#[derive(Debug, Error)]
pub enum WireError {
    /// Portable-storage container is malformed or misses a required field
    #[error("Portable storage: {0}")]
    Epee(#[from] cuprate_epee_encoding::error::Error),
    /// Block or transaction blob failed consensus decoding
    #[error("Blob: {0}")]
    Blob(#[from] monero::consensus::encode::EncodeError),
    /// Blob could not be written
    #[error("Blob encoding: {0}")]
    Io(#[from] std::io::Error),
}
