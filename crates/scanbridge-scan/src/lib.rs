//! Wallet-side scanning of CryptoNote chain data.
//!
//! Given a batch of blocks (or cached transaction descriptions) and a wallet's keys, find the
//! outputs that belong to the wallet, decode their amounts, and detect spends of outputs the
//! wallet already knew about.

pub mod assembler;
pub mod config;
pub mod crypto;
pub mod decoder;
mod error;
pub mod extra;
pub mod fee;
pub mod mixin;
pub mod model;
pub mod offline;
pub mod pool;
pub mod recognizer;
pub mod scanner;
pub mod spend;
pub mod wallet;

pub use config::{ConfigError, ScanConfig, ValidatedScanConfig};
pub use error::{CryptoError, RehydrateError, ScanError};
pub use scanner::{blocks_request, extract_utxos, key_image, scan_blocks, scan_response};
pub use wallet::WalletKeys;
