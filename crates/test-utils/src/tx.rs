use curve25519_dalek::scalar::Scalar;
use scanbridge_core::base::{KeyImage, PublicKey};
use scanbridge_scan::crypto::{
    KeyDerivation, commit, commitment_mask, encode_compact_ecdh, encode_legacy_ecdh,
};
use scanbridge_scan::model::has_compact_ecdh;
use scanbridge_wire::blob::{
    CtKey, EcdhInfo, Hash, Hash8, Key, KeyImage as InputImage, RawExtraField, RctSig, RctSigBase,
    RctType, Transaction, TransactionPrefix, TxIn, TxOut, TxOutTarget, VarInt,
};

use crate::wallet::{TestWallet, public_key, random_scalar, rng};

/// Default seed of the transaction secret key.
pub const TX_SECRET_SEED: u64 = 0x7478;

/// Key image of the input given to RingCT transactions that spend nothing the tests track.
pub const FILLER_KEY_IMAGE: [u8; 32] = [0xee; 32];

fn key_input(key_image: [u8; 32], amount: u64) -> TxIn {
    TxIn::ToKey {
        amount: VarInt(amount),
        key_offsets: vec![VarInt(1), VarInt(2), VarInt(3)],
        k_image: InputImage {
            image: Hash(key_image),
        },
    }
}

#[derive(Debug, Clone, Copy)]
struct Payment {
    view_public: PublicKey,
    spend_public: PublicKey,
    amount: u64,
}

/// Sender-side builder of a transaction paying to one or more wallets.
///
/// Outputs use the same stealth derivation and amount encoding a real sender would, so the
/// scanner recognizes outputs paid to a [`TestWallet`] and decodes their amounts.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    version: u64,
    rct_type: RctType,
    tx_secret: Scalar,
    payments: Vec<Payment>,
    inputs: Vec<TxIn>,
    nonce: Option<Vec<u8>>,
    fee: u64,
    view_tags: bool,
    write_tx_pub: bool,
}

impl TxBuilder {
    /// RingCT transaction of `rct_type`.
    #[must_use]
    pub fn v2(rct_type: RctType) -> Self {
        Self {
            version: 2,
            rct_type,
            tx_secret: random_scalar(&mut rng(TX_SECRET_SEED)),
            payments: Vec::new(),
            inputs: Vec::new(),
            nonce: None,
            fee: 0,
            view_tags: matches!(rct_type, RctType::BulletproofPlus),
            write_tx_pub: true,
        }
    }

    /// Pre-RingCT transaction with plaintext amounts.
    #[must_use]
    pub fn v1() -> Self {
        Self {
            version: 1,
            rct_type: RctType::Null,
            ..Self::v2(RctType::Null)
        }
    }

    /// Use a transaction secret drawn from `rng(seed)`.
    #[must_use]
    pub fn tx_secret_seed(mut self, seed: u64) -> Self {
        self.tx_secret = random_scalar(&mut rng(seed));
        self
    }

    /// Add an output paying `amount` to `wallet`.
    #[must_use]
    pub fn pay(mut self, wallet: &TestWallet, amount: u64) -> Self {
        self.payments.push(Payment {
            view_public: wallet.view_public(),
            spend_public: wallet.spend_public(),
            amount,
        });
        self
    }

    /// Add an output paying `amount` to the wallet with seed `seed`.
    #[must_use]
    pub fn pay_seed(self, seed: u64, amount: u64) -> Self {
        self.pay(&TestWallet::from_seed(seed), amount)
    }

    /// Add an input spending the output with `key_image`.
    #[must_use]
    pub fn spend(mut self, key_image: KeyImage, amount: u64) -> Self {
        self.inputs.push(key_input(key_image.to_bytes(), amount));
        self
    }

    /// Put `nonce` in the extra field.
    #[must_use]
    pub fn nonce(mut self, nonce: Vec<u8>) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// RingCT fee.
    #[must_use]
    pub const fn fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    /// Whether outputs carry view tags.
    #[must_use]
    pub const fn view_tags(mut self, view_tags: bool) -> Self {
        self.view_tags = view_tags;
        self
    }

    /// Leave the transaction public key out of the extra field.
    #[must_use]
    pub const fn without_tx_pub(mut self) -> Self {
        self.write_tx_pub = false;
        self
    }

    /// Transaction public key.
    #[must_use]
    pub fn tx_pub(&self) -> PublicKey {
        public_key(&self.tx_secret)
    }

    fn extra(&self) -> Vec<u8> {
        let mut extra = Vec::new();
        if self.write_tx_pub {
            extra.push(0x01);
            extra.extend(self.tx_pub().to_bytes());
        }
        if let Some(nonce) = &self.nonce {
            extra.push(0x02);
            extra.push(u8::try_from(nonce.len()).unwrap_or(u8::MAX));
            extra.extend(nonce);
        }
        extra
    }

    /// Build the (pruned) transaction.
    ///
    /// A RingCT transaction without spends gets one input with [`FILLER_KEY_IMAGE`], since the
    /// RingCT base is only serialized for transactions with inputs.
    ///
    /// # Panics
    /// If a payment's keys are not curve points.
    #[must_use]
    #[allow(clippy::unwrap_used, reason = "Fixture keys are valid points")]
    pub fn build(&self) -> Transaction {
        let mut outputs = Vec::new();
        let mut ecdh_info = Vec::new();
        let mut out_pk = Vec::new();
        for (index, payment) in (0_u64..).zip(&self.payments) {
            let derivation = KeyDerivation::generate(&payment.view_public, &self.tx_secret).unwrap();
            let key = derivation
                .derive_public_key(index, &payment.spend_public)
                .unwrap()
                .to_bytes();
            let target = if self.view_tags {
                TxOutTarget::ToTaggedKey {
                    key,
                    view_tag: derivation.view_tag(index),
                }
            } else {
                TxOutTarget::ToKey { key }
            };
            let plain = self.version == 1 || self.rct_type == RctType::Null;
            outputs.push(TxOut {
                amount: VarInt(if plain { payment.amount } else { 0 }),
                target,
            });
            if plain {
                continue;
            }
            let shared = derivation.to_scalar(index);
            let mask = if has_compact_ecdh(self.rct_type) {
                ecdh_info.push(EcdhInfo::Bulletproof {
                    amount: Hash8(encode_compact_ecdh(payment.amount, &shared)),
                });
                commitment_mask(&shared)
            } else {
                let mask = Scalar::from(index + 1000);
                let (mask_bytes, amount) = encode_legacy_ecdh(&mask, payment.amount, &shared);
                ecdh_info.push(EcdhInfo::Standard {
                    mask: Key { key: mask_bytes },
                    amount: Key { key: amount },
                });
                mask
            };
            out_pk.push(CtKey {
                mask: Key {
                    key: commit(&mask, payment.amount).to_bytes(),
                },
            });
        }

        let mut inputs = self.inputs.clone();
        if self.version != 1 && inputs.is_empty() {
            inputs.push(key_input(FILLER_KEY_IMAGE, 0));
        }
        let sig = (self.version != 1).then(|| RctSigBase {
            rct_type: self.rct_type,
            txn_fee: VarInt(self.fee),
            pseudo_outs: if self.rct_type == RctType::Simple {
                inputs.iter().map(|_| Key { key: [0; 32] }).collect()
            } else {
                Vec::new()
            },
            ecdh_info,
            out_pk,
        });
        Transaction {
            prefix: TransactionPrefix {
                version: VarInt(self.version),
                unlock_time: VarInt(0),
                inputs,
                outputs,
                extra: RawExtraField(self.extra()),
            },
            signatures: Vec::new(),
            rct_signatures: RctSig { sig, p: None },
        }
    }
}
