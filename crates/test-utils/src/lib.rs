//! Shared test utilities for the workspace.
//!
//! Builds wallets, sender-side transactions paying to them, binary block-batch responses
//! carrying those transactions and their cached descriptions.

#![allow(
    clippy::arithmetic_side_effects,
    reason = "Test fixtures use small, known values"
)]

mod chain;
mod offline;
mod tx;
mod wallet;

pub use chain::{ChainBuilder, block_timestamp, tx_id};
pub use offline::describe_offline;
pub use tx::{FILLER_KEY_IMAGE, TX_SECRET_SEED, TxBuilder};
pub use wallet::{TestWallet, public_key, random_scalar, rng};

/// Helper macro to create a 32-byte array whose last byte is `$v`.
///
/// Returns `[u8; 32]` which can be converted to the fixed-width key types via `.into()`.
#[macro_export]
macro_rules! key {
    ($v:expr) => {{
        let mut arr = [0_u8; 32];
        arr[31] = $v;
        arr.into()
    }};
}

/// Helper macro to create a vector of 32-byte arrays built with [`key!`].
#[macro_export]
macro_rules! keys {
    ($($v:expr),* $(,)?) => {{
        vec![$( $crate::key!($v) ),*]
    }};
}
