use monero::consensus::encode::Encodable;
use scanbridge_core::base::TxHash;
use scanbridge_scan::crypto::keccak256;
use scanbridge_wire::blob::{
    Block, BlockHeader, Hash, RawExtraField, RctSig, RctSigBase, RctType, Transaction,
    TransactionPrefix, TxIn, TxOut, TxOutTarget, VarInt, to_blob,
};
use scanbridge_wire::rpc::{
    BlockEntry, BlockOutputIndices, GetBlocksResponse, TxBlobEntry, TxOutputIndices,
};

#[allow(clippy::unwrap_used, reason = "Fixtures hold no script outputs")]
fn blob<T: Encodable>(value: &T) -> Vec<u8> {
    to_blob(value).unwrap()
}

/// Hash used as the id of `tx` in built blocks.
#[must_use]
pub fn tx_id(tx: &Transaction) -> TxHash {
    TxHash::new(keccak256(&[&blob(tx)]))
}

/// Timestamp given to the block at `height`.
#[must_use]
pub const fn block_timestamp(height: u64) -> u64 {
    1_400_000_000 + height * 120
}

fn coinbase(height: u64) -> Transaction {
    Transaction {
        prefix: TransactionPrefix {
            version: VarInt(2),
            unlock_time: VarInt(height + 60),
            inputs: vec![TxIn::Gen {
                height: VarInt(height),
            }],
            outputs: vec![TxOut {
                amount: VarInt(600_000_000_000),
                target: TxOutTarget::ToKey { key: [0x5a; 32] },
            }],
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
    }
}

/// Builder of a binary block-batch response.
///
/// Global output indices are assigned sequentially, coinbase first, across all blocks.
#[derive(Debug, Clone, Default)]
pub struct ChainBuilder {
    blocks: Vec<(u64, Vec<Transaction>)>,
    first_global_index: u64,
    current_height: Option<u64>,
}

impl ChainBuilder {
    /// Empty batch whose first output gets global index `first_global_index`.
    #[must_use]
    pub fn new(first_global_index: u64) -> Self {
        Self {
            first_global_index,
            ..Self::default()
        }
    }

    /// Append a block at `height` holding `txs`.
    #[must_use]
    pub fn block(mut self, height: u64, txs: Vec<Transaction>) -> Self {
        self.blocks.push((height, txs));
        self
    }

    /// Chain height to report; defaults to one past the last block.
    #[must_use]
    pub const fn current_height(mut self, height: u64) -> Self {
        self.current_height = Some(height);
        self
    }

    /// Build the typed response.
    #[must_use]
    pub fn response(&self) -> GetBlocksResponse {
        let mut next_global = self.first_global_index;
        let mut assign = |count: usize| {
            let indices: Vec<u64> = (next_global..).take(count).collect();
            next_global += u64::try_from(count).unwrap_or(u64::MAX);
            TxOutputIndices { indices }
        };

        let mut blocks = Vec::new();
        let mut output_indices = Vec::new();
        for (height, txs) in &self.blocks {
            let miner_tx = coinbase(*height);
            let mut slots = vec![assign(miner_tx.prefix.outputs.len())];
            slots.extend(txs.iter().map(|tx| assign(tx.prefix.outputs.len())));
            let block = Block {
                header: BlockHeader {
                    major_version: VarInt(16),
                    minor_version: VarInt(16),
                    timestamp: VarInt(block_timestamp(*height)),
                    prev_id: Hash([0; 32]),
                    nonce: 0,
                },
                miner_tx,
                tx_hashes: txs.iter().map(|tx| Hash(tx_id(tx).to_bytes())).collect(),
            };
            blocks.push(BlockEntry {
                block: blob(&block),
                txs: txs
                    .iter()
                    .map(|tx| TxBlobEntry {
                        blob: blob(tx),
                        prunable_hash: Some([0; 32]),
                    })
                    .collect(),
            });
            output_indices.push(BlockOutputIndices { indices: slots });
        }

        let last_height = self.blocks.last().map_or(0, |(height, _)| *height);
        GetBlocksResponse {
            blocks,
            start_height: self.blocks.first().map_or(0, |(height, _)| *height),
            current_height: self.current_height.unwrap_or(last_height + 1),
            status: "OK".to_owned(),
            untrusted: false,
            output_indices,
        }
    }

    /// Build the response as portable-storage bytes.
    ///
    /// # Panics
    /// If encoding fails.
    #[must_use]
    #[allow(clippy::unwrap_used, reason = "Fixture responses always encode")]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.response().to_bytes().unwrap()
    }
}
