//! Internal transaction representation shared by the live and cached scan paths.

use scanbridge_core::base::{KeyImage, PublicKey, TxHash};
use scanbridge_core::schema::response::{
    BlockRecord, MixinRecord, PaymentIdField, TxRecord, UtxoOrigin, UtxoRecord,
};
use scanbridge_wire::blob::{RctSigBase, RctType};

/// Whether `rct_type` encrypts amounts into 8 bytes and derives the commitment mask.
#[must_use]
pub const fn has_compact_ecdh(rct_type: RctType) -> bool {
    match rct_type {
        RctType::Bulletproof2 | RctType::Clsag | RctType::BulletproofPlus => true,
        RctType::Null | RctType::Full | RctType::Simple | RctType::Bulletproof => false,
    }
}

/// RingCT type carried by a consensus type tag.
#[must_use]
pub const fn rct_type_from_tag(tag: u64) -> Option<RctType> {
    Some(match tag {
        0 => RctType::Null,
        1 => RctType::Full,
        2 => RctType::Simple,
        3 => RctType::Bulletproof,
        4 => RctType::Bulletproof2,
        5 => RctType::Clsag,
        6 => RctType::BulletproofPlus,
        _ => return None,
    })
}

/// Consensus type tag of `rct_type`.
#[must_use]
pub const fn rct_type_tag(rct_type: RctType) -> u8 {
    match rct_type {
        RctType::Null => 0,
        RctType::Full => 1,
        RctType::Simple => 2,
        RctType::Bulletproof => 3,
        RctType::Bulletproof2 => 4,
        RctType::Clsag => 5,
        RctType::BulletproofPlus => 6,
    }
}

/// A key-targeted output of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    /// Position in the transaction's output vector.
    pub index: u64,
    /// One-time public key.
    pub key: PublicKey,
    /// Plain amount; only meaningful for version 1.
    pub amount: u64,
    /// View tag, when the output carries one.
    pub view_tag: Option<u8>,
}

/// An output recognized as the wallet's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utxo {
    /// Owning transaction.
    pub tx_id: TxHash,
    /// Local output index.
    pub vout: u64,
    /// Decoded amount.
    pub amount: u64,
    /// Key image that will mark the output spent.
    pub key_image: KeyImage,
    /// Transaction public key.
    pub tx_pub: PublicKey,
    /// One-time output key.
    pub output_key: PublicKey,
    /// Masked-commitment string.
    pub rv: String,
    /// Chain-wide output index; zero until patched from the index table.
    pub global_index: u64,
}

impl Utxo {
    /// Record layout for live scans.
    #[must_use]
    pub fn to_native_record(&self) -> UtxoRecord {
        UtxoRecord {
            vout: self.vout,
            amount: self.amount,
            key_image: self.key_image,
            origin: UtxoOrigin::Native {
                output_key: self.output_key,
                global_index: self.global_index,
                rv: self.rv.clone(),
            },
        }
    }

    /// Record layout for cached re-scans.
    #[must_use]
    pub fn to_cached_record(&self) -> UtxoRecord {
        UtxoRecord {
            vout: self.vout,
            amount: self.amount,
            key_image: self.key_image,
            origin: UtxoOrigin::Cached { tx_id: self.tx_id },
        }
    }
}

/// Ring-construction material for one RingCT output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mixin {
    /// Chain-wide output index.
    pub global_index: u64,
    /// One-time output key.
    pub public_key: PublicKey,
    /// Masked-commitment string.
    pub rct: String,
}

impl From<&Mixin> for MixinRecord {
    fn from(mixin: &Mixin) -> Self {
        Self {
            i: mixin.global_index,
            p: mixin.public_key,
            r: mixin.rct.clone(),
        }
    }
}

/// A transaction as seen by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeTx {
    /// Transaction hash.
    pub id: TxHash,
    /// Signature version.
    pub version: u64,
    /// Timestamp of the containing block.
    pub timestamp: u64,
    /// Height of the containing block.
    pub height: u64,
    /// RingCT base; `None` for version 1 and for transactions without inputs.
    pub rct: Option<RctSigBase>,
    /// Transaction public key, zero if the extra field has none.
    pub tx_pub: PublicKey,
    /// Non-zero payment identifier.
    pub payment_id: Option<PaymentIdField>,
    /// Fee.
    pub fee: u64,
    /// Key-targeted outputs.
    pub outputs: Vec<Output>,
    /// Inputs spending key images the caller already knew.
    pub spent: Vec<KeyImage>,
    /// Outputs recognized as the wallet's.
    pub utxos: Vec<Utxo>,
}

impl BridgeTx {
    /// Whether the transaction touches the wallet at all.
    #[must_use]
    pub const fn is_relevant(&self) -> bool {
        !self.utxos.is_empty() || !self.spent.is_empty()
    }

    /// Response record for live scans.
    #[must_use]
    pub fn to_record(&self) -> TxRecord {
        TxRecord {
            id: self.id,
            timestamp: self.timestamp,
            height: self.height,
            tx_pub: self.tx_pub,
            fee: self.fee,
            payment_id: self.payment_id,
            inputs: self.spent.clone(),
            utxos: self.utxos.iter().map(Utxo::to_native_record).collect(),
        }
    }
}

/// Everything one block contributes to a scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedBlock {
    /// Height from the coinbase input.
    pub height: u64,
    /// Header timestamp.
    pub timestamp: u64,
    /// Every transaction that decoded, relevant or not.
    pub txs: Vec<BridgeTx>,
    /// Ring material of the block's RingCT outputs.
    pub mixins: Vec<Mixin>,
}

impl ScannedBlock {
    /// Per-block summary record.
    #[must_use]
    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            h: self.height,
            t: self.timestamp,
            m: self.mixins.iter().map(MixinRecord::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_map_both_ways() {
        for tag in 0..=6_u8 {
            let rct_type = rct_type_from_tag(u64::from(tag)).unwrap_or(RctType::Null);
            assert_eq!(rct_type_tag(rct_type), tag);
        }
        assert_eq!(rct_type_from_tag(7), None);
        assert!(has_compact_ecdh(RctType::Clsag));
        assert!(!has_compact_ecdh(RctType::Bulletproof));
    }
}
