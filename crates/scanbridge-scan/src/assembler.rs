//! Final step of a live scan: order per-block outcomes and keep what the wallet cares about.

use scanbridge_core::schema::response::ScanResponse;

use crate::model::{BridgeTx, ScannedBlock};
use crate::pool::Tagged;

/// Combine per-block outcomes into a [`ScanResponse`].
///
/// Outcomes may arrive in any order; blocks are restored to their batch order by tag. Blocks that
/// failed to decode (`None`) are left out, and only transactions touching the wallet are kept.
#[must_use]
pub fn assemble(
    current_height: u64,
    mut outcomes: Vec<Tagged<Option<ScannedBlock>>>,
) -> ScanResponse {
    outcomes.sort_unstable_by_key(|outcome| outcome.index);
    let blocks: Vec<ScannedBlock> = outcomes
        .into_iter()
        .filter_map(|outcome| outcome.value)
        .collect();
    ScanResponse {
        current_height,
        txs: blocks
            .iter()
            .flat_map(|block| &block.txs)
            .filter(|tx| tx.is_relevant())
            .map(BridgeTx::to_record)
            .collect(),
        blocks: blocks.iter().map(ScannedBlock::to_record).collect(),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects, reason = "Tests")]

    use scanbridge_core::base::{KeyImage, PublicKey, TxHash};

    use super::*;
    use crate::model::{Mixin, Utxo};

    fn tx(id: u8, relevant: bool) -> BridgeTx {
        BridgeTx {
            id: TxHash::new([id; 32]),
            version: 2,
            timestamp: 0,
            height: 0,
            rct: None,
            tx_pub: PublicKey::default(),
            payment_id: None,
            fee: 0,
            outputs: Vec::new(),
            spent: if relevant {
                vec![KeyImage::new([id; 32])]
            } else {
                Vec::new()
            },
            utxos: Vec::new(),
        }
    }

    fn block(height: u64, txs: Vec<BridgeTx>) -> ScannedBlock {
        ScannedBlock {
            height,
            timestamp: height * 120,
            txs,
            mixins: vec![Mixin {
                global_index: height,
                public_key: PublicKey::default(),
                rct: String::new(),
            }],
        }
    }

    #[test]
    fn restores_batch_order_and_filters() {
        let outcomes = vec![
            Tagged {
                index: 2,
                value: Some(block(12, vec![tx(5, true)])),
            },
            Tagged {
                index: 0,
                value: Some(block(10, vec![tx(1, false), tx(2, true)])),
            },
            Tagged {
                index: 1,
                value: None,
            },
        ];
        let response = assemble(99, outcomes);
        assert_eq!(response.current_height, 99);
        let heights: Vec<u64> = response.blocks.iter().map(|block| block.h).collect();
        assert_eq!(heights, vec![10, 12]);
        assert_eq!(response.blocks[1].t, 1440);
        assert_eq!(response.blocks[0].m[0].i, 10);
        let ids: Vec<TxHash> = response.txs.iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![TxHash::new([2; 32]), TxHash::new([5; 32])]);
    }

    #[test]
    fn utxos_alone_make_a_transaction_relevant() {
        let mut owned = tx(3, false);
        owned.utxos.push(Utxo {
            tx_id: owned.id,
            vout: 0,
            amount: 1,
            key_image: KeyImage::default(),
            tx_pub: PublicKey::default(),
            output_key: PublicKey::default(),
            rv: String::new(),
            global_index: 8,
        });
        let response = assemble(
            0,
            vec![Tagged {
                index: 0,
                value: Some(block(1, vec![owned])),
            }],
        );
        assert_eq!(response.txs.len(), 1);
        assert_eq!(response.txs[0].utxos[0].vout, 0);
    }

    #[test]
    fn empty_batch_forwards_height() {
        let response = assemble(1234, Vec::new());
        assert_eq!(response.current_height, 1234);
        assert!(response.txs.is_empty());
        assert!(response.blocks.is_empty());
    }
}
