//! Re-hydration of cached transaction descriptions.
//!
//! Descriptions arrive as loosely typed JSON; every hex field is checked here and the first bad
//! one rejects the transaction, naming the field.

use scanbridge_core::base::{HexDecodeError, KEY_SIZE, PublicKey, TxHash, decode_fixed_hex};
use scanbridge_core::schema::request::{
    EcdhDescriptor, OfflineOutputDescriptor, OfflineRctDescriptor, OfflineTxDescriptor,
};
use scanbridge_wire::blob::{CtKey, EcdhInfo, Hash8, Key, RctSigBase, RctType, VarInt};

use crate::RehydrateError;
use crate::model::{BridgeTx, Output, has_compact_ecdh, rct_type_from_tag};

fn hex_field<const N: usize>(field: &'static str, value: &str) -> Result<[u8; N], RehydrateError> {
    decode_fixed_hex::<N>(value).map_err(|source: HexDecodeError| RehydrateError::InvalidHex {
        field,
        source,
    })
}

fn required<'a>(field: &'static str, value: Option<&'a String>) -> Result<&'a str, RehydrateError> {
    value
        .map(String::as_str)
        .ok_or(RehydrateError::MissingField(field))
}

fn rct_type(tag: u64) -> Result<RctType, RehydrateError> {
    rct_type_from_tag(tag).ok_or(RehydrateError::UnknownRctType(tag))
}

fn ecdh_info(rct_type: RctType, ecdh: &EcdhDescriptor) -> Result<EcdhInfo, RehydrateError> {
    let amount = required("tx_desc.rv.ecdhInfo.amount", ecdh.amount.as_ref())?;
    if has_compact_ecdh(rct_type) {
        return Ok(EcdhInfo::Bulletproof {
            amount: Hash8(hex_field("tx_desc.rv.ecdhInfo.amount", amount)?),
        });
    }
    let mask = required("tx_desc.rv.ecdhInfo.mask", ecdh.mask.as_ref())?;
    Ok(EcdhInfo::Standard {
        mask: Key {
            key: hex_field("tx_desc.rv.ecdhInfo.mask", mask)?,
        },
        amount: Key {
            key: hex_field("tx_desc.rv.ecdhInfo.amount", amount)?,
        },
    })
}

fn rct_base(rv: &OfflineRctDescriptor) -> Result<RctSigBase, RehydrateError> {
    let rct_type = rct_type(rv.rct_type)?;
    let ecdh_info = rv
        .ecdh_info
        .iter()
        .map(|ecdh| ecdh_info(rct_type, ecdh))
        .collect::<Result<_, _>>()?;
    let out_pk = rv
        .out_pk
        .iter()
        .map(|commitment| {
            hex_field::<KEY_SIZE>("tx_desc.rv.outPk.mask", &commitment.mask)
                .map(|key| CtKey { mask: Key { key } })
        })
        .collect::<Result<_, _>>()?;
    Ok(RctSigBase {
        rct_type,
        txn_fee: VarInt(0),
        pseudo_outs: Vec::new(),
        ecdh_info,
        out_pk,
    })
}

fn output(index: u64, output: &OfflineOutputDescriptor) -> Result<Output, RehydrateError> {
    Ok(Output {
        index,
        key: PublicKey::new(hex_field("tx_desc.outputs.pub", &output.key)?),
        amount: output.amount,
        view_tag: None,
    })
}

/// Validate `desc` and build the scanner view of it.
///
/// Cached descriptions carry no fee, block position or payment id; those stay at their defaults.
///
/// # Errors
/// The first malformed, missing or out-of-range field.
pub fn rehydrate(desc: &OfflineTxDescriptor) -> Result<BridgeTx, RehydrateError> {
    let id = TxHash::new(hex_field("tx_desc.id", &desc.id)?);
    let tx_pub = PublicKey::new(hex_field("tx_desc.pub", &desc.tx_pub)?);
    let rct = Some(rct_base(&desc.rv)?);
    let outputs = desc
        .outputs
        .iter()
        .zip(0_u64..)
        .map(|(desc, index)| output(index, desc))
        .collect::<Result<_, _>>()?;
    Ok(BridgeTx {
        id,
        version: desc.version,
        timestamp: 0,
        height: 0,
        rct,
        tx_pub,
        payment_id: None,
        fee: 0,
        outputs,
        spent: Vec::new(),
        utxos: Vec::new(),
    })
}
