//! Caller-supplied wallet keys.
//!
//! Secrets are reduced to scalars on entry and zeroized when the keys are dropped; nothing here
//! outlives the request that supplied them.

use std::fmt;

use curve25519_dalek::scalar::Scalar;
use scanbridge_core::base::{KeyImage, PublicKey, SecretKey};
use scanbridge_core::schema::request::WalletKeysDescriptor;
use zeroize::Zeroizing;

use crate::CryptoError;
use crate::crypto::{KeyDerivation, generate_key_image};

/// Key material of the wallet being scanned for, held only for the duration of one call.
pub struct WalletKeys {
    view_secret: Zeroizing<Scalar>,
    spend_secret: Zeroizing<Scalar>,
    spend_public: PublicKey,
}

impl fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKeys")
            .field("spend_public", &self.spend_public)
            .finish_non_exhaustive()
    }
}

impl WalletKeys {
    /// Build from raw key material. Secret bytes are reduced modulo the group order.
    #[must_use]
    pub fn new(view_secret: &SecretKey, spend_secret: &SecretKey, spend_public: PublicKey) -> Self {
        Self {
            view_secret: Zeroizing::new(Scalar::from_bytes_mod_order(*view_secret.expose_bytes())),
            spend_secret: Zeroizing::new(Scalar::from_bytes_mod_order(
                *spend_secret.expose_bytes(),
            )),
            spend_public,
        }
    }

    /// Secret view scalar.
    #[must_use]
    pub fn view_secret(&self) -> &Scalar {
        &self.view_secret
    }

    /// Secret spend scalar.
    #[must_use]
    pub fn spend_secret(&self) -> &Scalar {
        &self.spend_secret
    }

    /// Public spend key.
    #[must_use]
    pub const fn spend_public(&self) -> &PublicKey {
        &self.spend_public
    }

    /// Derivation shared with the sender of a transaction.
    ///
    /// # Errors
    /// If `tx_pub` is not a curve point.
    pub fn derivation(&self, tx_pub: &PublicKey) -> Result<KeyDerivation, CryptoError> {
        KeyDerivation::generate(tx_pub, &self.view_secret)
    }

    /// Key image of output `index` of the transaction with public key `tx_pub`, assuming the
    /// output pays to this wallet.
    ///
    /// # Errors
    /// If `tx_pub` or the public spend key is not a curve point.
    pub fn key_image(&self, tx_pub: &PublicKey, index: u64) -> Result<KeyImage, CryptoError> {
        let derivation = self.derivation(tx_pub)?;
        let output_key = derivation.derive_public_key(index, &self.spend_public)?;
        let output_secret = derivation.derive_secret_key(index, &self.spend_secret);
        Ok(generate_key_image(&output_key, &output_secret))
    }
}

impl From<&WalletKeysDescriptor> for WalletKeys {
    fn from(keys: &WalletKeysDescriptor) -> Self {
        Self::new(&keys.sec_view_key, &keys.sec_spend_key, keys.pub_spend_key)
    }
}
