//! Ownership test, amount decoding and key images for the outputs of one transaction.

use scanbridge_core::base::Commitment;
use scanbridge_wire::blob::{EcdhInfo, RctType};

use crate::ScanError;
use crate::crypto::{
    DecodedAmount, KeyDerivation, decode_compact_ecdh, decode_legacy_ecdh, generate_key_image,
    verify_commitment,
};
use crate::mixin::commitment_string;
use crate::model::{BridgeTx, Output, Utxo};
use crate::wallet::WalletKeys;

/// Try every output of `tx` against `keys`.
///
/// Outputs that are not the wallet's are left out. Each owned output yields either a [`Utxo`]
/// (with `global_index` still zero) or the error that stopped its amount from being decoded;
/// callers decide whether that drops the output or fails the request.
#[must_use]
pub fn recognize(tx: &BridgeTx, keys: &WalletKeys) -> Vec<Result<Utxo, ScanError>> {
    let derivation = match keys.derivation(&tx.tx_pub) {
        Ok(derivation) => derivation,
        Err(error) => {
            tracing::debug!(tx_id = %tx.id, %error, "No derivation for transaction");
            return Vec::new();
        }
    };
    tx.outputs
        .iter()
        .filter(|output| is_ours(tx, output, &derivation, keys))
        .map(|output| owned_output(tx, output, &derivation, keys))
        .collect()
}

fn is_ours(tx: &BridgeTx, output: &Output, derivation: &KeyDerivation, keys: &WalletKeys) -> bool {
    if let Some(view_tag) = output.view_tag {
        if view_tag != derivation.view_tag(output.index) {
            return false;
        }
    }
    match derivation.derive_public_key(output.index, keys.spend_public()) {
        Ok(expected) => expected == output.key,
        Err(error) => {
            tracing::debug!(tx_id = %tx.id, vout = output.index, %error, "Output skipped");
            false
        }
    }
}

fn owned_output(
    tx: &BridgeTx,
    output: &Output,
    derivation: &KeyDerivation,
    keys: &WalletKeys,
) -> Result<Utxo, ScanError> {
    let amount = if tx.version == 2 {
        decode_amount(tx, output, derivation)?
    } else {
        output.amount
    };
    let output_secret = derivation.derive_secret_key(output.index, keys.spend_secret());
    let key_image = generate_key_image(&output.key, &output_secret);
    Ok(Utxo {
        tx_id: tx.id,
        vout: output.index,
        amount,
        key_image,
        tx_pub: tx.tx_pub,
        output_key: output.key,
        rv: tx
            .rct
            .as_ref()
            .map(|rct| commitment_string(rct, output.index))
            .unwrap_or_default(),
        global_index: 0,
    })
}

fn decode_amount(
    tx: &BridgeTx,
    output: &Output,
    derivation: &KeyDerivation,
) -> Result<u64, ScanError> {
    let index = output.index;
    // coinbase outputs keep their amount in the clear
    let Some(rct) = &tx.rct else {
        return Ok(output.amount);
    };
    let slot = usize::try_from(index).ok();
    let ecdh = slot.and_then(|slot| rct.ecdh_info.get(slot));
    let commitment = slot.and_then(|slot| rct.out_pk.get(slot));
    let shared = derivation.to_scalar(index);

    let decoded: DecodedAmount = match (rct.rct_type, ecdh) {
        (RctType::Null, None) => return Ok(output.amount),
        (
            RctType::Null | RctType::Full | RctType::Simple | RctType::Bulletproof,
            Some(EcdhInfo::Standard { mask, amount }),
        ) => decode_legacy_ecdh(&mask.key, &amount.key, &shared),
        (
            RctType::Bulletproof2 | RctType::Clsag | RctType::BulletproofPlus,
            Some(EcdhInfo::Bulletproof { amount }),
        ) => decode_compact_ecdh(&amount.0, &shared),
        (
            RctType::Null
            | RctType::Full
            | RctType::Simple
            | RctType::Bulletproof
            | RctType::Bulletproof2
            | RctType::Clsag
            | RctType::BulletproofPlus,
            _,
        ) => return Err(ScanError::MissingRctData { index }),
    };
    let commitment = commitment.ok_or(ScanError::MissingRctData { index })?;
    verify_commitment(&Commitment::new(commitment.mask.key), &decoded)?;
    Ok(decoded.amount)
}
