//! Transaction fees, explicit for RingCT and derived from plaintext amounts before it.

use scanbridge_core::base::TxHash;
use scanbridge_wire::blob::{Transaction, TxIn};

/// Fee paid by `tx`.
///
/// RingCT transactions carry it explicitly. Version 1 transactions pay the difference between
/// input and output amounts, computed with wrapping arithmetic; a wrap is logged and the wrapped
/// value returned.
#[must_use]
pub fn compute_fee(tx: &Transaction, id: &TxHash) -> u64 {
    match tx.prefix.version.0 {
        1 => {
            let inputs = tx
                .prefix
                .inputs
                .iter()
                .filter_map(|input| match input {
                    TxIn::ToKey { amount, .. } => Some(amount.0),
                    TxIn::Gen { .. } => None,
                })
                .fold(0_u64, u64::wrapping_add);
            let outputs = tx
                .prefix
                .outputs
                .iter()
                .map(|output| output.amount.0)
                .fold(0_u64, u64::wrapping_add);
            let (fee, wrapped) = inputs.overflowing_sub(outputs);
            if wrapped {
                tracing::warn!(tx_id = %id, inputs, outputs, "Version 1 fee underflows");
            }
            fee
        }
        2 => tx
            .rct_signatures
            .sig
            .as_ref()
            .map_or(0, |rct| rct.txn_fee.0),
        _ => 0,
    }
}
