use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, PickFirst, serde_as};

use crate::base::{KeyImage, PublicKey, SecretKey};

/// Wallet key material supplied with every request.
///
/// The `*_string` spellings are accepted for compatibility with older clients.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WalletKeysDescriptor {
    /// Secret view key.
    #[serde(rename = "sec_viewKey", alias = "sec_viewKey_string")]
    pub sec_view_key: SecretKey,
    /// Secret spend key.
    #[serde(rename = "sec_spendKey", alias = "sec_spendKey_string")]
    pub sec_spend_key: SecretKey,
    /// Public spend key.
    #[serde(rename = "pub_spendKey", alias = "pub_spendKey_string")]
    pub pub_spend_key: PublicKey,
}

/// Request for scanning a binary block batch.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScanRequest {
    /// Wallet keys.
    #[serde(flatten)]
    pub keys: WalletKeysDescriptor,
    /// Key images of outputs the wallet already owns, used to detect spends.
    #[serde(default)]
    pub key_images: Vec<KeyImage>,
}

/// Request for re-hydrating and scanning cached transaction descriptions.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OfflineRequest {
    /// Wallet keys.
    #[serde(flatten)]
    pub keys: WalletKeysDescriptor,
    /// Cached transactions.
    pub txs: Vec<OfflineTxDescriptor>,
}

/// A transaction as cached by a light-wallet server.
///
/// Hex fields stay as text here; width checks happen during re-hydration so that failures can
/// name the offending field.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OfflineTxDescriptor {
    /// Transaction hash.
    pub id: String,
    /// Transaction public key.
    #[serde(rename = "pub")]
    pub tx_pub: String,
    /// Signature version, as a number or decimal string.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schemars(with = "u64")]
    pub version: u64,
    /// RingCT payload.
    pub rv: OfflineRctDescriptor,
    /// Outputs in transaction order.
    pub outputs: Vec<OfflineOutputDescriptor>,
}

/// Cached RingCT payload.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OfflineRctDescriptor {
    /// RingCT type tag, as a number or decimal string.
    #[serde(rename = "type")]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schemars(with = "u64")]
    pub rct_type: u64,
    /// Per-output ECDH tuples.
    #[serde(rename = "ecdhInfo")]
    pub ecdh_info: Vec<EcdhDescriptor>,
    /// Per-output commitments.
    #[serde(rename = "outPk")]
    pub out_pk: Vec<OutPkDescriptor>,
}

/// Cached ECDH tuple. Compact subtypes carry only an 8-byte `amount`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct EcdhDescriptor {
    /// Encoded mask (legacy subtypes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    /// Encoded amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
}

/// Cached output commitment.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OutPkDescriptor {
    /// Commitment point.
    pub mask: String,
}

/// Cached output.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OfflineOutputDescriptor {
    /// One-time output key.
    #[serde(rename = "pub")]
    pub key: String,
    /// Plain amount for version 1 transactions, usually zero otherwise.
    #[serde(default)]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schemars(with = "u64")]
    pub amount: u64,
}

/// Request for computing a single key image.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct KeyImageRequest {
    /// Wallet keys.
    #[serde(flatten)]
    pub keys: WalletKeysDescriptor,
    /// Public key of the transaction holding the output.
    pub tx_pub_key: PublicKey,
    /// Output index within that transaction.
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schemars(with = "u64")]
    pub out_index: u64,
}
