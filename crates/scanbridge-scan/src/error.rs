use scanbridge_core::base::HexDecodeError;
use scanbridge_wire::WireError;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures of the curve primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Bytes that should encode a curve point do not
    #[error("Invalid {0}: not a curve point")]
    InvalidPoint(&'static str),
    /// Decoded mask and amount do not open the output commitment
    #[error("Decoded amount does not match the output commitment")]
    CommitmentMismatch,
}

/// Validation failures while re-hydrating a cached transaction description
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RehydrateError {
    /// Hex field of the wrong width or alphabet
    #[error("Invalid '{field}': {source}")]
    InvalidHex {
        /// Dotted path of the offending field
        field: &'static str,
        /// Underlying decode failure
        source: HexDecodeError,
    },
    /// Required field absent
    #[error("Missing '{0}'")]
    MissingField(&'static str),
    /// RingCT type tag outside the known set
    #[error("Invalid 'tx_desc.rv.type': {0}")]
    UnknownRctType(u64),
}

/// Errors surfaced by the scanning entry points
#[derive(Debug, Error)]
pub enum ScanError {
    /// Malformed daemon response
    #[error("Wire: {0}")]
    Wire(#[from] WireError),
    /// Curve primitive failure
    #[error("Crypto: {0}")]
    Crypto(#[from] CryptoError),
    /// Invalid cached transaction description
    #[error("Transaction {index}: {source}")]
    Rehydrate {
        /// Position of the transaction in the request
        index: usize,
        /// Underlying validation failure
        source: RehydrateError,
    },
    /// Owned output whose RingCT commitment or ECDH entry is absent or of the wrong shape
    #[error("Output {index} has no usable RingCT data")]
    MissingRctData {
        /// Local output index
        index: u64,
    },
    /// Invalid scan configuration
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
    /// Worker pool could not be created
    #[error("Worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
