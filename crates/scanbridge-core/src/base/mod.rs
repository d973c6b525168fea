//! Foundational primitive types and byte/serde helpers.

mod keys;
mod utils;

pub use keys::{
    Commitment, EncryptedPaymentId, KEY_SIZE, KeyImage, PaymentId, PublicKey, SecretKey, TxHash,
};
pub use utils::{HexDecodeError, decode_fixed_hex};
