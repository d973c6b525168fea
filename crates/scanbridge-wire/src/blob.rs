//! Block and transaction blobs.
//!
//! Decoding goes through the `monero` consensus codec. Daemons usually ship pruned transactions,
//! so [`parse_transaction_base`] stops after the RingCT base instead of requiring the prunable
//! signature data.

use std::io::Cursor;

pub use monero::blockdata::block::{Block, BlockHeader};
pub use monero::blockdata::transaction::{
    ExtraField, KeyImage, RawExtraField, SubField, Transaction, TransactionError, TransactionPrefix,
    TxIn, TxOut, TxOutTarget,
};
pub use monero::consensus::encode::VarInt;
pub use monero::cryptonote::hash::{Hash, Hash8};
pub use monero::util::key::PublicKey;
pub use monero::util::ringct::{CtKey, EcdhInfo, Key, RctSig, RctSigBase, RctType};
use monero::consensus::encode::{Decodable, Encodable, deserialize};
use tracing::trace;

use crate::WireError;

/// Width of keys, key images, hashes and commitments.
pub const HASH_SIZE: usize = 32;

/// A 32-byte key, key image, hash or commitment.
pub type Hash32 = [u8; HASH_SIZE];

/// Decode a block blob.
///
/// # Errors
/// If the blob is truncated, malformed or carries trailing bytes.
pub fn parse_block(blob: &[u8]) -> Result<Block, WireError> {
    Ok(deserialize(blob)?)
}

/// Height recorded in the coinbase input of `block`.
#[must_use]
pub fn block_height(block: &Block) -> Option<u64> {
    match block.miner_tx.prefix.inputs.first()? {
        TxIn::Gen { height } => Some(height.0),
        TxIn::ToKey { .. } => None,
    }
}

/// Decode a complete transaction blob, prunable signatures included.
///
/// # Errors
/// If the blob is truncated, malformed or carries trailing bytes.
pub fn parse_transaction(blob: &[u8]) -> Result<Transaction, WireError> {
    Ok(deserialize(blob)?)
}

/// Decode the prefix and RingCT base of a transaction blob, ignoring whatever follows.
///
/// Version 1 transactions and RingCT transactions without inputs come back without a base.
///
/// # Errors
/// If the prefix or the base is truncated or malformed.
pub fn parse_transaction_base(blob: &[u8]) -> Result<Transaction, WireError> {
    let mut reader = Cursor::new(blob);
    let prefix = TransactionPrefix::consensus_decode(&mut reader)?;
    let sig = if prefix.version.0 >= 2 && !prefix.inputs.is_empty() {
        RctSigBase::consensus_decode(&mut reader, prefix.inputs.len(), prefix.outputs.len())?
    } else {
        None
    };
    trace!(
        consumed = reader.position(),
        len = blob.len(),
        "Decoded transaction base"
    );
    Ok(Transaction {
        prefix,
        signatures: Vec::new(),
        rct_signatures: RctSig { sig, p: None },
    })
}

/// Consensus encoding of `value`.
///
/// # Errors
/// If `value` holds a variant the codec cannot write, such as a script output.
pub fn to_blob<T: Encodable + ?Sized>(value: &T) -> Result<Vec<u8>, WireError> {
    let mut out = Vec::new();
    value.consensus_encode(&mut out)?;
    Ok(out)
}
