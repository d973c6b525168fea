//! Cached transaction descriptions, as a light-wallet server stores them.

use scanbridge_core::schema::request::{
    EcdhDescriptor, OfflineOutputDescriptor, OfflineRctDescriptor, OfflineTxDescriptor,
    OutPkDescriptor,
};
use scanbridge_scan::extra::ExtraInfo;
use scanbridge_scan::model::rct_type_tag;
use scanbridge_wire::blob::{EcdhInfo, RctType, Transaction, TxOutTarget};

use crate::tx_id;

/// Describe a version 2 `tx` the way it would be cached after a live scan.
#[must_use]
pub fn describe_offline(tx: &Transaction) -> OfflineTxDescriptor {
    let rct = tx.rct_signatures.sig.as_ref();
    let tx_pub = ExtraInfo::parse(&tx.prefix.extra)
        .map(|info| info.tx_pub)
        .unwrap_or_default();
    OfflineTxDescriptor {
        id: tx_id(tx).to_string(),
        tx_pub: tx_pub.to_string(),
        version: tx.prefix.version.0,
        rv: OfflineRctDescriptor {
            rct_type: u64::from(rct_type_tag(rct.map_or(RctType::Null, |rct| rct.rct_type))),
            ecdh_info: rct
                .iter()
                .flat_map(|rct| &rct.ecdh_info)
                .map(|info| match info {
                    EcdhInfo::Standard { mask, amount } => EcdhDescriptor {
                        mask: Some(hex::encode(mask.key)),
                        amount: Some(hex::encode(amount.key)),
                    },
                    EcdhInfo::Bulletproof { amount } => EcdhDescriptor {
                        mask: None,
                        amount: Some(hex::encode(amount.0)),
                    },
                })
                .collect(),
            out_pk: rct
                .iter()
                .flat_map(|rct| &rct.out_pk)
                .map(|commitment| OutPkDescriptor {
                    mask: hex::encode(commitment.mask.key),
                })
                .collect(),
        },
        outputs: tx
            .prefix
            .outputs
            .iter()
            .map(|output| OfflineOutputDescriptor {
                key: match &output.target {
                    TxOutTarget::ToKey { key } | TxOutTarget::ToTaggedKey { key, .. } => {
                        hex::encode(key)
                    }
                    TxOutTarget::ToScript { .. } | TxOutTarget::ToScriptHash { .. } => {
                        String::new()
                    }
                },
                amount: output.amount.0,
            })
            .collect(),
    }
}
