//! Curve primitives behind output recognition.
//!
//! Point decoding, `Hs`, `Hp` and Pedersen commitments come from `monero_ed25519`; this module
//! strings them into the CryptoNote derivation scheme. Callers pass and receive byte-level key
//! types from `scanbridge_core`.

#![allow(
    clippy::arithmetic_side_effects,
    reason = "Scalar and point arithmetic is modular"
)]

use curve25519_dalek::edwards::EdwardsPoint;
use curve25519_dalek::scalar::Scalar;
use monero::consensus::encode::{Encodable, VarInt};
use monero_ed25519::{Commitment as Opening, CompressedPoint, Point, Scalar as HashedScalar};
use scanbridge_core::base::{Commitment, KeyImage, PublicKey};
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::CryptoError;

/// Keccak-256 over the concatenation of `parts`.
#[must_use]
pub fn keccak256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// `Hs`: Keccak-256 reduced modulo the group order.
#[must_use]
pub fn hash_to_scalar(parts: &[&[u8]]) -> Scalar {
    HashedScalar::hash(parts.concat()).into()
}

fn varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(10);
    // writes into a Vec cannot fail
    VarInt(value)
        .consensus_encode(&mut out)
        .map_or_else(|_| Vec::new(), |_| out)
}

fn decompress(bytes: &[u8; 32], what: &'static str) -> Result<EdwardsPoint, CryptoError> {
    CompressedPoint::from(*bytes)
        .decompress()
        .map(Point::into)
        .ok_or(CryptoError::InvalidPoint(what))
}

/// Shared secret `8·a·B` between a transaction key and a wallet view key.
///
/// Symmetric: the receiver computes it from `(R, v)`, the sender from `(V, r)`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KeyDerivation([u8; 32]);

impl std::fmt::Debug for KeyDerivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("KeyDerivation(<redacted>)")
    }
}

impl KeyDerivation {
    /// Derive from a public point and a secret scalar.
    ///
    /// # Errors
    /// [`CryptoError::InvalidPoint`] if `public` is not a canonically encoded curve point.
    pub fn generate(public: &PublicKey, secret: &Scalar) -> Result<Self, CryptoError> {
        let point = decompress(public, "transaction public key")?;
        Ok(Self((secret * point).mul_by_cofactor().compress().to_bytes()))
    }

    /// Compressed derivation bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `Hs(D ‖ varint(index))`, the per-output shared scalar.
    #[must_use]
    pub fn to_scalar(&self, index: u64) -> Scalar {
        hash_to_scalar(&[&self.0, &varint(index)])
    }

    /// One-byte view tag of output `index`.
    #[must_use]
    pub fn view_tag(&self, index: u64) -> u8 {
        let [tag, ..] = keccak256(&[b"view_tag", &self.0, &varint(index)]);
        tag
    }

    /// One-time output key `Hs(D, i)·G + S`.
    ///
    /// # Errors
    /// [`CryptoError::InvalidPoint`] if `spend_public` is not a curve point.
    pub fn derive_public_key(
        &self,
        index: u64,
        spend_public: &PublicKey,
    ) -> Result<PublicKey, CryptoError> {
        let spend = decompress(spend_public, "spend public key")?;
        let key = EdwardsPoint::mul_base(&self.to_scalar(index)) + spend;
        Ok(PublicKey::new(key.compress().to_bytes()))
    }

    /// One-time output secret `Hs(D, i) + s`.
    #[must_use]
    pub fn derive_secret_key(&self, index: u64, spend_secret: &Scalar) -> Zeroizing<Scalar> {
        Zeroizing::new(self.to_scalar(index) + spend_secret)
    }
}

/// Key image `x·Hp(P)` of the output with one-time key `output_key` and secret `x`.
#[must_use]
pub fn generate_key_image(output_key: &PublicKey, output_secret: &Scalar) -> KeyImage {
    let base: EdwardsPoint = Point::biased_hash(output_key.to_bytes()).into();
    KeyImage::new((output_secret * base).compress().to_bytes())
}

/// A decoded RingCT amount with its commitment mask.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedAmount {
    /// Commitment blinding factor.
    pub mask: Scalar,
    /// Plain amount.
    pub amount: u64,
}

impl std::fmt::Debug for DecodedAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedAmount")
            .field("amount", &self.amount)
            .finish_non_exhaustive()
    }
}

fn low_u64(scalar: &Scalar) -> u64 {
    let [b0, b1, b2, b3, b4, b5, b6, b7, ..] = scalar.to_bytes();
    u64::from_le_bytes([b0, b1, b2, b3, b4, b5, b6, b7])
}

/// Blinding factor of compact ECDH subtypes, `Hs("commitment_mask" ‖ shared)`.
#[must_use]
pub fn commitment_mask(shared: &Scalar) -> Scalar {
    hash_to_scalar(&[b"commitment_mask", shared.as_bytes()])
}

fn amount_pad(shared: &Scalar) -> [u8; 8] {
    let [p0, p1, p2, p3, p4, p5, p6, p7, ..] = keccak256(&[b"amount", shared.as_bytes()]);
    [p0, p1, p2, p3, p4, p5, p6, p7]
}

fn xor8(a: [u8; 8], b: [u8; 8]) -> [u8; 8] {
    (u64::from_le_bytes(a) ^ u64::from_le_bytes(b)).to_le_bytes()
}

/// Undo the 32-byte ECDH encoding: `mask − Hs(k)`, `amount − Hs(Hs(k))`.
#[must_use]
pub fn decode_legacy_ecdh(mask: &[u8; 32], amount: &[u8; 32], shared: &Scalar) -> DecodedAmount {
    let mask_pad = hash_to_scalar(&[shared.as_bytes()]);
    let amount_pad = hash_to_scalar(&[mask_pad.as_bytes()]);
    DecodedAmount {
        mask: Scalar::from_bytes_mod_order(*mask) - mask_pad,
        amount: low_u64(&(Scalar::from_bytes_mod_order(*amount) - amount_pad)),
    }
}

/// Sender side of [`decode_legacy_ecdh`].
#[must_use]
pub fn encode_legacy_ecdh(mask: &Scalar, amount: u64, shared: &Scalar) -> ([u8; 32], [u8; 32]) {
    let mask_pad = hash_to_scalar(&[shared.as_bytes()]);
    let amount_pad = hash_to_scalar(&[mask_pad.as_bytes()]);
    (
        (mask + mask_pad).to_bytes(),
        (Scalar::from(amount) + amount_pad).to_bytes(),
    )
}

/// Undo the 8-byte XOR encoding; the mask is derived from the shared scalar.
#[must_use]
pub fn decode_compact_ecdh(amount: &[u8; 8], shared: &Scalar) -> DecodedAmount {
    DecodedAmount {
        mask: commitment_mask(shared),
        amount: u64::from_le_bytes(xor8(*amount, amount_pad(shared))),
    }
}

/// Sender side of [`decode_compact_ecdh`].
#[must_use]
pub fn encode_compact_ecdh(amount: u64, shared: &Scalar) -> [u8; 8] {
    xor8(amount.to_le_bytes(), amount_pad(shared))
}

/// Pedersen commitment `mask·G + amount·H`.
#[must_use]
pub fn commit(mask: &Scalar, amount: u64) -> Commitment {
    let opening = Opening::new(HashedScalar::from(*mask), amount);
    Commitment::new(opening.commit().compress().to_bytes())
}

/// Check that `decoded` opens `commitment`.
///
/// # Errors
/// [`CryptoError::CommitmentMismatch`] if it does not.
pub fn verify_commitment(commitment: &Commitment, decoded: &DecodedAmount) -> Result<(), CryptoError> {
    if commit(&decoded.mask, decoded.amount) == *commitment {
        Ok(())
    } else {
        Err(CryptoError::CommitmentMismatch)
    }
}
