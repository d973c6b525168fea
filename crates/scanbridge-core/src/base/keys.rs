//! Fixed-width key, image and hash types.
//!
//! Every type here travels as lowercase hex in the JSON envelopes and is compared byte-for-byte.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_with::hex::Hex;
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::utils::{HexDecodeError, decode_fixed_hex};

/// Size of a curve point, scalar or hash in bytes
pub const KEY_SIZE: usize = 32;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $size:expr) => {
        $(#[$meta])*
        #[serde_as]
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Serialize,
            Deserialize,
            JsonSchema,
        )]
        #[repr(transparent)]
        pub struct $name(
            #[serde_as(as = "Hex")]
            #[schemars(with = "String")]
            [u8; $size],
        );

        impl $name {
            /// Wrap raw bytes.
            #[must_use]
            pub const fn new(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }

            /// Copy out the raw bytes.
            #[must_use]
            pub const fn to_bytes(self) -> [u8; $size] {
                self.0
            }

            /// Whether every byte is zero.
            #[must_use]
            pub fn is_zero(&self) -> bool {
                self.0.iter().all(|byte| *byte == 0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl FromStr for $name {
            type Err = HexDecodeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_fixed_hex::<$size>(s).map(Self)
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $size] {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = [u8; $size];

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = std::array::TryFromSliceError;

            fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
                let arr: [u8; $size] = slice.try_into()?;
                Ok(Self(arr))
            }
        }
    };
}

fixed_bytes!(
    /// Compressed ed25519 point: a wallet spend key, a transaction key or a one-time output key.
    PublicKey,
    KEY_SIZE
);

fixed_bytes!(
    /// Key image identifying the spend of one output.
    KeyImage,
    KEY_SIZE
);

fixed_bytes!(
    /// Transaction or block hash.
    TxHash,
    KEY_SIZE
);

fixed_bytes!(
    /// RingCT output commitment or ECDH field.
    Commitment,
    KEY_SIZE
);

fixed_bytes!(
    /// Short payment identifier carried encrypted in the extra nonce.
    EncryptedPaymentId,
    8
);

fixed_bytes!(
    /// Long payment identifier carried in plain text in the extra nonce.
    PaymentId,
    KEY_SIZE
);

/// Secret scalar (view or spend key).
///
/// Wiped on drop and never printed.
#[serde_as]
#[derive(Clone, Serialize, Deserialize, JsonSchema, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(
    #[serde_as(as = "Hex")]
    #[schemars(with = "String")]
    [u8; KEY_SIZE],
);

impl SecretKey {
    /// Wrap raw scalar bytes.
    #[must_use]
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Borrow the raw scalar bytes.
    #[must_use]
    pub const fn expose_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

impl FromStr for SecretKey {
    type Err = HexDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<KEY_SIZE>(s).map(Self)
    }
}
