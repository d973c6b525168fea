//! Turns one block of a batched fetch response into scanner transactions.
//!
//! Nothing here fails the batch: a block or transaction that does not decode is logged and
//! left out.

use scanbridge_core::base::{PublicKey, TxHash};
use scanbridge_wire::blob::{
    Transaction, TxIn, TxOutTarget, block_height, parse_block, parse_transaction,
    parse_transaction_base,
};
use scanbridge_wire::rpc::{BlockEntry, GetBlocksResponse};
use tracing::{debug, warn};

use crate::extra::{ExtraError, ExtraInfo};
use crate::fee::compute_fee;
use crate::model::{BridgeTx, Output};

/// A transaction together with what the scanner needs besides the [`BridgeTx`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTx {
    /// Scanner view of the transaction.
    pub tx: BridgeTx,
    /// Inputs, for spend matching.
    pub inputs: Vec<TxIn>,
    /// Global index of each output, by local output index.
    pub global_indices: Vec<u64>,
}

/// A decoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    /// Height from the coinbase input.
    pub height: u64,
    /// Header timestamp.
    pub timestamp: u64,
    /// Transactions that decoded, in block order.
    pub txs: Vec<DecodedTx>,
}

const fn key_output(target: &TxOutTarget) -> Option<([u8; 32], Option<u8>)> {
    match target {
        TxOutTarget::ToKey { key } => Some((*key, None)),
        TxOutTarget::ToTaggedKey { key, view_tag } => Some((*key, Some(*view_tag))),
        TxOutTarget::ToScript { .. } | TxOutTarget::ToScriptHash { .. } => None,
    }
}

/// Build the scanner view of a parsed transaction.
///
/// Script outputs are left out but keep their place in the local index numbering.
///
/// # Errors
/// If the extra field does not parse.
pub fn bridge_tx(
    tx: &Transaction,
    id: TxHash,
    timestamp: u64,
    height: u64,
) -> Result<BridgeTx, ExtraError> {
    let extra = ExtraInfo::parse(&tx.prefix.extra)?;
    let outputs = tx
        .prefix
        .outputs
        .iter()
        .zip(0_u64..)
        .filter_map(|(output, index)| {
            let (key, view_tag) = key_output(&output.target)?;
            Some(Output {
                index,
                key: PublicKey::new(key),
                amount: output.amount.0,
                view_tag,
            })
        })
        .collect();
    Ok(BridgeTx {
        id,
        version: tx.prefix.version.0,
        timestamp,
        height,
        rct: tx.rct_signatures.sig.clone(),
        tx_pub: extra.tx_pub,
        payment_id: extra.payment_id,
        fee: compute_fee(tx, &id),
        outputs,
        spent: Vec::new(),
        utxos: Vec::new(),
    })
}

fn parse_tx_blob(blob: &[u8]) -> Option<Transaction> {
    match parse_transaction(blob) {
        Ok(tx) => Some(tx),
        Err(full_error) => match parse_transaction_base(blob) {
            Ok(tx) => {
                debug!(%full_error, "Full parse failed, using prefix and RingCT base");
                Some(tx)
            }
            Err(error) => {
                warn!(%error, "Dropping transaction that does not parse");
                None
            }
        },
    }
}

/// Decode block `block_index` of `response`.
///
/// Returns `None` if the block blob does not parse or carries no coinbase height. A transaction
/// whose global-index slot is missing or shorter than its output list keeps its inputs but loses
/// its outputs, so spends are still reported.
#[must_use]
pub fn decode_block(response: &GetBlocksResponse, block_index: usize) -> Option<DecodedBlock> {
    let entry: &BlockEntry = response.blocks.get(block_index)?;
    let block = match parse_block(&entry.block) {
        Ok(block) => block,
        Err(error) => {
            warn!(block_index, %error, "Dropping block that does not parse");
            return None;
        }
    };
    let Some(height) = block_height(&block) else {
        warn!(block_index, "Dropping block without a coinbase height");
        return None;
    };
    let timestamp = block.header.timestamp.0;

    let txs = entry
        .txs
        .iter()
        .enumerate()
        .filter_map(|(position, blob)| {
            let Some(id) = block.tx_hashes.get(position).map(|hash| TxHash::new(hash.0)) else {
                warn!(height, position, "Dropping transaction without a hash");
                return None;
            };
            let tx = parse_tx_blob(&blob.blob)?;
            let mut bridge = match bridge_tx(&tx, id, timestamp, height) {
                Ok(bridge) => bridge,
                Err(error) => {
                    warn!(height, tx_id = %id, %error, "Dropping transaction with bad extra");
                    return None;
                }
            };
            let global_indices = match response.global_index_slot(block_index, position) {
                Some(indices) if indices.len() >= tx.prefix.outputs.len() => indices.to_vec(),
                Some(_) | None => {
                    warn!(
                        height,
                        tx_id = %id,
                        "No global indices, dropping outputs and keeping spends"
                    );
                    bridge.outputs.clear();
                    Vec::new()
                }
            };
            Some(DecodedTx {
                tx: bridge,
                inputs: tx.prefix.inputs,
                global_indices,
            })
        })
        .collect();

    Some(DecodedBlock {
        height,
        timestamp,
        txs,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "Tests")]

    use std::collections::HashSet;

    use hex_literal::hex;
    use scanbridge_core::base::KeyImage;
    use scanbridge_wire::blob::{
        Block, BlockHeader, Hash, KeyImage as InputImage, RawExtraField, RctSig, RctSigBase,
        RctType, TransactionPrefix, TxOut, VarInt, to_blob,
    };
    use scanbridge_wire::rpc::{BlockOutputIndices, TxBlobEntry, TxOutputIndices};

    use super::*;
    use crate::spend::match_spends;

    const TX_PUB: [u8; 32] = hex!("5fd9bf938cf132790bdc5c528037e347828c539e82da6e5921e3d1e6052cb258");

    fn spend_input(byte: u8) -> TxIn {
        TxIn::ToKey {
            amount: VarInt(90),
            key_offsets: vec![VarInt(3)],
            k_image: InputImage {
                image: Hash([byte; 32]),
            },
        }
    }

    fn v1_tx(extra: Vec<u8>) -> Transaction {
        Transaction {
            prefix: TransactionPrefix {
                version: VarInt(1),
                unlock_time: VarInt(0),
                inputs: Vec::new(),
                outputs: vec![
                    TxOut {
                        amount: VarInt(40),
                        target: TxOutTarget::ToKey { key: [4; 32] },
                    },
                    TxOut {
                        amount: VarInt(50),
                        target: TxOutTarget::ToTaggedKey {
                            key: [5; 32],
                            view_tag: 0x77,
                        },
                    },
                ],
                extra: RawExtraField(extra),
            },
            signatures: Vec::new(),
            rct_signatures: RctSig { sig: None, p: None },
        }
    }

    fn pubkey_extra() -> Vec<u8> {
        let mut extra = vec![0x01];
        extra.extend(TX_PUB);
        extra
    }

    fn blob(tx: &Transaction) -> Vec<u8> {
        to_blob(tx).unwrap()
    }

    fn block_blob(miner_input: TxIn, tx_count: usize) -> Vec<u8> {
        let block = Block {
            header: BlockHeader {
                major_version: VarInt(1),
                minor_version: VarInt(1),
                timestamp: VarInt(1_500_000_000),
                prev_id: Hash([0; 32]),
                nonce: 0,
            },
            miner_tx: Transaction {
                prefix: TransactionPrefix {
                    version: VarInt(2),
                    unlock_time: VarInt(0),
                    inputs: vec![miner_input],
                    outputs: Vec::new(),
                    extra: RawExtraField(Vec::new()),
                },
                signatures: Vec::new(),
                rct_signatures: RctSig {
                    sig: Some(RctSigBase {
                        rct_type: RctType::Null,
                        txn_fee: VarInt(0),
                        pseudo_outs: Vec::new(),
                        ecdh_info: Vec::new(),
                        out_pk: Vec::new(),
                    }),
                    p: None,
                },
            },
            tx_hashes: (1..=tx_count)
                .map(|n| Hash([u8::try_from(n).unwrap(); 32]))
                .collect(),
        };
        to_blob(&block).unwrap()
    }

    fn response(block: Vec<u8>, txs: Vec<Vec<u8>>, slots: Vec<Vec<u64>>) -> GetBlocksResponse {
        GetBlocksResponse {
            blocks: vec![BlockEntry {
                block,
                txs: txs
                    .into_iter()
                    .map(|blob| TxBlobEntry {
                        blob,
                        prunable_hash: None,
                    })
                    .collect(),
            }],
            current_height: 200,
            output_indices: vec![BlockOutputIndices {
                indices: slots
                    .into_iter()
                    .map(|indices| TxOutputIndices { indices })
                    .collect(),
            }],
            ..GetBlocksResponse::default()
        }
    }

    #[test]
    fn decodes_transactions_with_ids_and_indices() {
        let response = response(
            block_blob(TxIn::Gen { height: VarInt(100) }, 1),
            vec![blob(&v1_tx(pubkey_extra()))],
            vec![vec![], vec![70, 71]],
        );
        let block = decode_block(&response, 0).unwrap();
        assert_eq!((block.height, block.timestamp), (100, 1_500_000_000));
        assert_eq!(block.txs.len(), 1);
        let decoded = &block.txs[0];
        assert_eq!(decoded.global_indices, vec![70, 71]);
        assert_eq!(decoded.tx.id, TxHash::new([1; 32]));
        assert_eq!(decoded.tx.tx_pub, PublicKey::new(TX_PUB));
        assert_eq!(decoded.tx.version, 1);
        assert_eq!(decoded.tx.rct, None);
        assert_eq!(decoded.tx.outputs[1].view_tag, Some(0x77));
        assert_eq!(decoded.tx.outputs[1].amount, 50);
        assert_eq!(decoded.tx.outputs[1].index, 1);
    }

    #[test]
    fn skips_bad_transactions_but_keeps_the_block() {
        let good = blob(&v1_tx(pubkey_extra()));
        let bad_extra = blob(&v1_tx(vec![0x05]));
        let response = response(
            block_blob(TxIn::Gen { height: VarInt(100) }, 3),
            // 4 blobs but only 3 hashes
            vec![good.clone(), bad_extra, vec![0xff], good],
            vec![vec![], vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]],
        );
        let block = decode_block(&response, 0).unwrap();
        assert_eq!(block.txs.len(), 1);
        assert_eq!(block.txs[0].tx.id, TxHash::new([1; 32]));
    }

    #[test]
    fn short_index_slot_keeps_spends_and_drops_outputs() {
        let mut tx = v1_tx(pubkey_extra());
        // no ring signatures follow, so only the base parse succeeds
        tx.prefix.inputs = vec![spend_input(8), spend_input(9)];
        let response = response(
            block_blob(TxIn::Gen { height: VarInt(100) }, 2),
            vec![blob(&tx), blob(&tx)],
            // second transaction has no slot at all
            vec![vec![], vec![70]],
        );
        let block = decode_block(&response, 0).unwrap();
        assert_eq!(block.txs.len(), 2);
        for decoded in &block.txs {
            assert!(decoded.tx.outputs.is_empty());
            assert!(decoded.global_indices.is_empty());
            let known = HashSet::from([KeyImage::new([9; 32])]);
            assert_eq!(
                match_spends(&decoded.inputs, &known),
                vec![KeyImage::new([9; 32])]
            );
        }
    }

    #[test]
    fn script_outputs_keep_their_index() {
        let mut tx = v1_tx(pubkey_extra());
        tx.prefix.outputs.insert(
            0,
            TxOut {
                amount: VarInt(1),
                target: TxOutTarget::ToScriptHash { hash: Hash([0; 32]) },
            },
        );
        let bridge = bridge_tx(&tx, TxHash::default(), 0, 0).unwrap();
        assert_eq!(bridge.outputs.len(), 2);
        assert_eq!(bridge.outputs[0].index, 1);
        assert_eq!(bridge.outputs[1].index, 2);
    }

    #[test]
    fn drops_blocks_without_height_or_parse() {
        let no_gen = response(block_blob(spend_input(0), 0), vec![], vec![]);
        assert_eq!(decode_block(&no_gen, 0), None);

        let garbage = response(vec![1, 2, 3], vec![], vec![]);
        assert_eq!(decode_block(&garbage, 0), None);
        assert_eq!(decode_block(&garbage, 1), None);
    }
}
