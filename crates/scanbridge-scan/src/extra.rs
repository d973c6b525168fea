//! Transaction extra-field parsing.
//!
//! Sub-fields are split by the `monero` consensus codec. Only the transaction public key and the
//! payment id in the nonce matter for scanning, but every sub-field is decoded so that a malformed
//! one rejects the whole transaction.

use scanbridge_core::base::{EncryptedPaymentId, KEY_SIZE, PaymentId, PublicKey};
use scanbridge_core::schema::response::PaymentIdField;
use scanbridge_wire::blob::{ExtraField, RawExtraField, SubField, TransactionError};
use thiserror::Error;

const NONCE_PAYMENT_ID: u8 = 0x00;
const NONCE_ENCRYPTED_PAYMENT_ID: u8 = 0x01;

/// Extra-field parse failures
#[derive(Debug, PartialEq, Error)]
pub enum ExtraError {
    /// Unknown tag, truncated sub-field, non-zero padding or off-curve key
    #[error("Malformed extra field: {0}")]
    Malformed(#[from] TransactionError),
}

/// Split `extra` into sub-fields.
///
/// # Errors
/// On an unknown tag, a truncated sub-field, invalid padding or a key that is not a curve point.
pub fn parse_extra(extra: &RawExtraField) -> Result<ExtraField, ExtraError> {
    Ok(extra.try_parse()?)
}

/// Payment id carried by a nonce: the encrypted 8-byte form wins over the plain 32-byte form.
#[must_use]
pub fn payment_id_from_nonce(nonce: &[u8]) -> Option<PaymentIdField> {
    match nonce.split_first()? {
        (&NONCE_ENCRYPTED_PAYMENT_ID, id) => <[u8; 8]>::try_from(id)
            .ok()
            .map(|id| PaymentIdField::Encrypted(EncryptedPaymentId::new(id))),
        (&NONCE_PAYMENT_ID, id) => <[u8; KEY_SIZE]>::try_from(id)
            .ok()
            .map(|id| PaymentIdField::Plain(PaymentId::new(id))),
        _ => None,
    }
}

/// What the scanner needs from the extra field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtraInfo {
    /// First transaction public key, zero if absent.
    pub tx_pub: PublicKey,
    /// Payment id of the first nonce, if present and non-zero.
    pub payment_id: Option<PaymentIdField>,
}

impl ExtraInfo {
    /// Pick the first public key and the first nonce.
    #[must_use]
    pub fn from_fields(fields: &ExtraField) -> Self {
        let tx_pub = fields
            .tx_pubkey()
            .map(|key| PublicKey::new(key.to_bytes()))
            .unwrap_or_default();
        let payment_id = fields
            .0
            .iter()
            .find_map(|field| {
                if let SubField::Nonce(nonce) = field {
                    Some(nonce)
                } else {
                    None
                }
            })
            .and_then(|nonce| payment_id_from_nonce(nonce))
            .filter(|id| match id {
                PaymentIdField::Encrypted(id) => !id.is_zero(),
                PaymentIdField::Plain(id) => !id.is_zero(),
            });
        Self { tx_pub, payment_id }
    }

    /// Parse `extra` and summarize it.
    ///
    /// # Errors
    /// See [`parse_extra`].
    pub fn parse(extra: &RawExtraField) -> Result<Self, ExtraError> {
        parse_extra(extra).map(|fields| Self::from_fields(&fields))
    }
}
