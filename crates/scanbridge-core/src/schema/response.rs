use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::base::{EncryptedPaymentId, KeyImage, PaymentId, PublicKey, TxHash};

/// Result of scanning a block batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScanResponse {
    /// Chain height reported by the daemon, forwarded unchanged.
    pub current_height: u64,
    /// Transactions that pay to or spend from the wallet, in chain order.
    pub txs: Vec<TxRecord>,
    /// One summary per decoded block, in chain order.
    pub blocks: Vec<BlockRecord>,
}

/// A transaction relevant to the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TxRecord {
    /// Transaction hash.
    pub id: TxHash,
    /// Timestamp of the containing block.
    pub timestamp: u64,
    /// Height of the containing block.
    pub height: u64,
    /// Transaction public key (zero when the extra field carries none).
    #[serde(rename = "pub")]
    pub tx_pub: PublicKey,
    /// Fee paid by the transaction.
    pub fee: u64,
    /// Payment identifier, when one is present and non-zero.
    #[serde(flatten)]
    pub payment_id: Option<PaymentIdField>,
    /// Inputs spending outputs the wallet already knew about.
    pub inputs: Vec<KeyImage>,
    /// Outputs received by the wallet.
    pub utxos: Vec<UtxoRecord>,
}

/// Payment identifier attached to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PaymentIdField {
    /// 8-byte identifier, still encrypted.
    #[serde(rename = "epid")]
    Encrypted(EncryptedPaymentId),
    /// 32-byte plain identifier.
    #[serde(rename = "pid")]
    Plain(PaymentId),
}

/// An output owned by the wallet.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UtxoRecord {
    /// Output index within its transaction.
    pub vout: u64,
    /// Decoded amount as a decimal string.
    #[serde_as(as = "DisplayFromStr")]
    #[schemars(with = "String")]
    pub amount: u64,
    /// Key image that will mark this output as spent.
    pub key_image: KeyImage,
    /// Mode-specific fields.
    #[serde(flatten)]
    pub origin: UtxoOrigin,
}

/// Fields that differ between live scans and cached re-scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum UtxoOrigin {
    /// Emitted when scanning chain data.
    Native {
        /// One-time output key.
        #[serde(rename = "pub")]
        output_key: PublicKey,
        /// Chain-wide output index.
        global_index: u64,
        /// Masked-commitment string of the output.
        rv: String,
    },
    /// Emitted when scanning cached transactions.
    Cached {
        /// Owning transaction hash.
        tx_id: TxHash,
    },
}

/// Per-block summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlockRecord {
    /// Block height.
    pub h: u64,
    /// Block timestamp.
    pub t: u64,
    /// Ring material for every RingCT output in the block.
    pub m: Vec<MixinRecord>,
}

/// Ownership-agnostic ring member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MixinRecord {
    /// Chain-wide output index.
    pub i: u64,
    /// One-time output key.
    pub p: PublicKey,
    /// Masked-commitment string.
    pub r: String,
}

/// Result of scanning cached transactions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct UtxosResponse {
    /// Outputs received by the wallet, in request order.
    pub outputs: Vec<UtxoRecord>,
}

/// Result of a single key-image computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct KeyImageResponse {
    /// The computed key image.
    pub key_image: KeyImage,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Tests")]

    use serde_json::json;

    use super::*;

    fn utxo(origin: UtxoOrigin) -> UtxoRecord {
        UtxoRecord {
            vout: 1,
            amount: 1_000_000_000_000,
            key_image: KeyImage::new([9_u8; 32]),
            origin,
        }
    }

    #[test]
    fn native_utxo_layout() {
        let record = utxo(UtxoOrigin::Native {
            output_key: PublicKey::new([1_u8; 32]),
            global_index: 42,
            rv: "abc".to_owned(),
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "vout": 1,
                "amount": "1000000000000",
                "key_image": "09".repeat(32),
                "pub": "01".repeat(32),
                "global_index": 42,
                "rv": "abc",
            })
        );
        let back: UtxoRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn cached_utxo_layout() {
        let record = utxo(UtxoOrigin::Cached {
            tx_id: TxHash::new([2_u8; 32]),
        });
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["tx_id"], json!("02".repeat(32)));
        assert!(value.get("global_index").is_none());
    }

    #[test]
    fn payment_id_is_flattened_and_optional() {
        let mut tx = TxRecord {
            id: TxHash::default(),
            timestamp: 1,
            height: 2,
            tx_pub: PublicKey::default(),
            fee: 3,
            payment_id: Some(PaymentIdField::Encrypted(EncryptedPaymentId::new([0xab; 8]))),
            inputs: Vec::new(),
            utxos: Vec::new(),
        };
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["epid"], json!("abababababababab"));
        assert!(value.get("pid").is_none());

        tx.payment_id = None;
        let value = serde_json::to_value(&tx).unwrap();
        assert!(value.get("epid").is_none());
        assert!(value.get("pid").is_none());
        assert_eq!(value["inputs"], json!([]));
    }
}
