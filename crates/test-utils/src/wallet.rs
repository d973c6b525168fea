use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use scanbridge_core::base::{PublicKey, SecretKey};
use scanbridge_core::schema::request::WalletKeysDescriptor;
use scanbridge_scan::WalletKeys;

/// Deterministic RNG for fixtures.
#[must_use]
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uniformly random scalar.
pub fn random_scalar(rng: &mut impl RngCore) -> Scalar {
    let mut bytes = [0_u8; 64];
    rng.fill_bytes(&mut bytes);
    Scalar::from_bytes_mod_order_wide(&bytes)
}

/// `secret·G` as a compressed key.
#[must_use]
pub fn public_key(secret: &Scalar) -> PublicKey {
    PublicKey::new(EdwardsPoint::mul_base(secret).compress().to_bytes())
}

/// A wallet with deterministic keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestWallet {
    view_secret: Scalar,
    spend_secret: Scalar,
}

impl TestWallet {
    /// Wallet whose keys are drawn from `rng(seed)`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = rng(seed);
        Self {
            view_secret: random_scalar(&mut rng),
            spend_secret: random_scalar(&mut rng),
        }
    }

    /// Secret view scalar.
    #[must_use]
    pub const fn view_secret(&self) -> Scalar {
        self.view_secret
    }

    /// Secret spend scalar.
    #[must_use]
    pub const fn spend_secret(&self) -> Scalar {
        self.spend_secret
    }

    /// Public view key.
    #[must_use]
    pub fn view_public(&self) -> PublicKey {
        public_key(&self.view_secret)
    }

    /// Public spend key.
    #[must_use]
    pub fn spend_public(&self) -> PublicKey {
        public_key(&self.spend_secret)
    }

    /// Request-envelope form of the keys.
    #[must_use]
    pub fn descriptor(&self) -> WalletKeysDescriptor {
        WalletKeysDescriptor {
            sec_view_key: SecretKey::new(self.view_secret.to_bytes()),
            sec_spend_key: SecretKey::new(self.spend_secret.to_bytes()),
            pub_spend_key: self.spend_public(),
        }
    }

    /// Scanner form of the keys.
    #[must_use]
    pub fn keys(&self) -> WalletKeys {
        WalletKeys::from(&self.descriptor())
    }
}
