//! Ring-construction material for RingCT outputs.

use scanbridge_wire::blob::{EcdhInfo, RctSigBase, RctType};

use crate::model::{BridgeTx, Mixin};

/// Masked-commitment string of output `index`: the commitment followed by its ECDH tuple, hex
/// encoded.
///
/// Null bases, and outputs without RingCT data, give an empty string.
#[must_use]
pub fn commitment_string(rct: &RctSigBase, index: u64) -> String {
    match rct.rct_type {
        RctType::Null => return String::new(),
        RctType::Full
        | RctType::Simple
        | RctType::Bulletproof
        | RctType::Bulletproof2
        | RctType::Clsag
        | RctType::BulletproofPlus => {}
    }
    let Ok(index) = usize::try_from(index) else {
        return String::new();
    };
    match (rct.out_pk.get(index), rct.ecdh_info.get(index)) {
        (Some(commitment), Some(EcdhInfo::Standard { mask, amount })) => [
            hex::encode(commitment.mask.key),
            hex::encode(mask.key),
            hex::encode(amount.key),
        ]
        .concat(),
        (Some(commitment), Some(EcdhInfo::Bulletproof { amount })) => {
            [hex::encode(commitment.mask.key), hex::encode(amount.0)].concat()
        }
        (None, _) | (_, None) => String::new(),
    }
}

/// One [`Mixin`] per output of a version 2 transaction, with global indices taken from
/// `global_indices` (indexed by local output index). Version 1 transactions contribute none.
#[must_use]
pub fn extract_mixins(tx: &BridgeTx, global_indices: &[u64]) -> Vec<Mixin> {
    if tx.version != 2 {
        return Vec::new();
    }
    tx.outputs
        .iter()
        .filter_map(|output| {
            let global_index = usize::try_from(output.index)
                .ok()
                .and_then(|index| global_indices.get(index))?;
            Some(Mixin {
                global_index: *global_index,
                public_key: output.key,
                rct: tx
                    .rct
                    .as_ref()
                    .map(|rct| commitment_string(rct, output.index))
                    .unwrap_or_default(),
            })
        })
        .collect()
}
