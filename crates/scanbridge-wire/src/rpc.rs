//! Typed views of the binary batched block-fetch call.
//!
//! Each type implements [`EpeeObject`] with a hand-written builder, the way
//! `cuprate_epee_encoding` expects. Fields the daemon adds that we do not read (`pruned`,
//! `block_weight`, `top_hash`, ...) are skipped by the decoder.

use bytes::{Buf, BufMut};
use cuprate_epee_encoding::error::{Error, Result};
use cuprate_epee_encoding::{
    EpeeObject, EpeeObjectBuilder, EpeeValue, InnerMarker, Marker, from_bytes, read_epee_value,
    to_bytes, write_field,
};
use hex_literal::hex;
use tracing::debug;

use crate::WireError;
use crate::blob::{HASH_SIZE, Hash32};

/// Mainnet genesis block id, the default sole entry of a request's known-block list.
pub const MAINNET_GENESIS_ID: Hash32 =
    hex!("418015bb9ae982a1975da7d79277c2705727a56894ba0fb246adaabb1f4632e3");

fn fixed_chunks<const N: usize>(field: &str, bytes: &[u8]) -> Result<Vec<[u8; N]>> {
    let (chunks, rest) = bytes.as_chunks::<N>();
    if !rest.is_empty() {
        return Err(Error::Value(format!(
            "Field `{field}` must be a multiple of {N} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(chunks.to_vec())
}

fn required<T>(value: Option<T>, message: &'static str) -> Result<T> {
    value.ok_or(Error::Format(message))
}

/// Write `value` under `name` unless it would be omitted, keeping `number_of_fields` honest.
fn write_present<T: EpeeValue, B: BufMut>(value: T, name: &str, w: &mut B) -> Result<()> {
    if value.should_write() {
        write_field(value, name, w)
    } else {
        Ok(())
    }
}

fn count_present(present: &[bool]) -> u64 {
    u64::try_from(present.iter().filter(|written| **written).count()).unwrap_or(u64::MAX)
}

fn encode<T: EpeeObject>(value: T) -> std::result::Result<Vec<u8>, WireError> {
    Ok(to_bytes(value)?.to_vec())
}

fn decode<T: EpeeObject>(mut data: &[u8]) -> std::result::Result<T, WireError> {
    Ok(from_bytes(&mut data)?)
}

/// Batched block-fetch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBlocksRequest {
    /// Known block ids, newest first; the daemon starts after the first one it recognizes.
    pub block_ids: Vec<Hash32>,
    /// First height to return.
    pub start_height: u64,
    /// Ask for pruned transaction blobs.
    pub prune: bool,
    /// Omit coinbase transactions.
    pub no_miner_tx: bool,
}

impl GetBlocksRequest {
    /// Request starting at `start_height`, pruned, with the genesis block as the only known id.
    #[must_use]
    pub fn from_height(start_height: u64) -> Self {
        Self {
            block_ids: vec![MAINNET_GENESIS_ID],
            start_height,
            prune: true,
            no_miner_tx: false,
        }
    }

    /// Encode as a portable-storage document.
    ///
    /// # Errors
    /// If the id list is too large for the container.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, WireError> {
        encode(self.clone())
    }

    /// Decode a portable-storage document.
    ///
    /// # Errors
    /// If the document is malformed, `block_ids` is not a whole number of ids, or `start_height`
    /// is missing.
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, WireError> {
        decode(data)
    }
}

/// Field-by-field builder for [`GetBlocksRequest`].
#[derive(Default)]
pub struct GetBlocksRequestBuilder {
    block_ids: Option<Vec<u8>>,
    start_height: Option<u64>,
    prune: Option<bool>,
    no_miner_tx: Option<bool>,
}

impl EpeeObjectBuilder<GetBlocksRequest> for GetBlocksRequestBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "block_ids" => self.block_ids = Some(read_epee_value(r)?),
            "start_height" => self.start_height = Some(read_epee_value(r)?),
            "prune" => self.prune = Some(read_epee_value(r)?),
            "no_miner_tx" => self.no_miner_tx = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<GetBlocksRequest> {
        let block_ids =
            fixed_chunks::<HASH_SIZE>("block_ids", &self.block_ids.unwrap_or_default())?;
        Ok(GetBlocksRequest {
            block_ids,
            start_height: required(self.start_height, "Required field start_height missing")?,
            prune: self.prune.unwrap_or_default(),
            no_miner_tx: self.no_miner_tx.unwrap_or_default(),
        })
    }
}

impl EpeeObject for GetBlocksRequest {
    type Builder = GetBlocksRequestBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[
            self.block_ids.concat().should_write(),
            self.start_height.should_write(),
            self.prune.should_write(),
            self.no_miner_tx.should_write(),
        ])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(self.block_ids.concat(), "block_ids", w)?;
        write_present(self.start_height, "start_height", w)?;
        write_present(self.prune, "prune", w)?;
        write_present(self.no_miner_tx, "no_miner_tx", w)?;
        Ok(())
    }
}

/// One transaction blob of a block entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxBlobEntry {
    /// Transaction blob, pruned or full.
    pub blob: Vec<u8>,
    /// Hash of the pruned-away data, when the daemon pruned the blob.
    pub prunable_hash: Option<Hash32>,
}

/// Field-by-field builder for [`TxBlobEntry`].
#[derive(Default)]
pub struct TxBlobEntryBuilder {
    blob: Option<Vec<u8>>,
    prunable_hash: Option<Vec<u8>>,
}

impl EpeeObjectBuilder<TxBlobEntry> for TxBlobEntryBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "blob" => self.blob = Some(read_epee_value(r)?),
            "prunable_hash" => self.prunable_hash = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<TxBlobEntry> {
        let prunable_hash = self
            .prunable_hash
            .map(|bytes| {
                Hash32::try_from(bytes.as_slice()).map_err(|_| {
                    Error::Value(format!(
                        "Field `prunable_hash` must be {HASH_SIZE} bytes, got {}",
                        bytes.len()
                    ))
                })
            })
            .transpose()?;
        Ok(TxBlobEntry {
            blob: required(self.blob, "Required field blob missing")?,
            prunable_hash,
        })
    }
}

impl EpeeObject for TxBlobEntry {
    type Builder = TxBlobEntryBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[
            self.blob.should_write(),
            self.prunable_hash.is_some_and(|hash| hash.to_vec().should_write()),
        ])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(self.blob, "blob", w)?;
        if let Some(hash) = self.prunable_hash {
            write_present(hash.to_vec(), "prunable_hash", w)?;
        }
        Ok(())
    }
}

/// `txs` of a block entry: an object array when pruned, a bare blob array otherwise.
struct TxBlobs(Vec<TxBlobEntry>);

impl EpeeValue for TxBlobs {
    const MARKER: Marker = Marker::new(InnerMarker::Object).into_seq();

    fn read<B: Buf>(r: &mut B, marker: &Marker) -> Result<Self> {
        if matches!(marker.inner_marker, InnerMarker::String) {
            let blobs = <Vec<Vec<u8>> as EpeeValue>::read(r, marker)?;
            return Ok(Self(
                blobs
                    .into_iter()
                    .map(|blob| TxBlobEntry {
                        blob,
                        prunable_hash: None,
                    })
                    .collect(),
            ));
        }
        <Vec<TxBlobEntry> as EpeeValue>::read(r, marker).map(Self)
    }

    fn should_write(&self) -> bool {
        !self.0.is_empty()
    }

    fn write<B: BufMut>(self, w: &mut B) -> Result<()> {
        self.0.write(w)
    }
}

/// One block of the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEntry {
    /// Block blob.
    pub block: Vec<u8>,
    /// Non-coinbase transaction blobs in block order.
    pub txs: Vec<TxBlobEntry>,
}

/// Field-by-field builder for [`BlockEntry`].
#[derive(Default)]
pub struct BlockEntryBuilder {
    block: Option<Vec<u8>>,
    txs: Option<TxBlobs>,
}

impl EpeeObjectBuilder<BlockEntry> for BlockEntryBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "block" => self.block = Some(read_epee_value(r)?),
            "txs" => self.txs = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<BlockEntry> {
        Ok(BlockEntry {
            block: required(self.block, "Required field block missing")?,
            txs: self.txs.map(|txs| txs.0).unwrap_or_default(),
        })
    }
}

impl EpeeObject for BlockEntry {
    type Builder = BlockEntryBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[self.block.should_write(), !self.txs.is_empty()])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(self.block, "block", w)?;
        write_present(TxBlobs(self.txs), "txs", w)?;
        Ok(())
    }
}

/// `indices` of one transaction: a `u64` array, or a packed little-endian blob.
struct OutputIndexList(Vec<u64>);

impl EpeeValue for OutputIndexList {
    const MARKER: Marker = Marker::new(InnerMarker::U64).into_seq();

    fn read<B: Buf>(r: &mut B, marker: &Marker) -> Result<Self> {
        if marker.is_seq {
            return <Vec<u64> as EpeeValue>::read(r, marker).map(Self);
        }
        let packed = <Vec<u8> as EpeeValue>::read(r, marker)?;
        Ok(Self(
            fixed_chunks::<8>("indices", &packed)?
                .into_iter()
                .map(u64::from_le_bytes)
                .collect(),
        ))
    }

    fn should_write(&self) -> bool {
        !self.0.is_empty()
    }

    fn write<B: BufMut>(self, w: &mut B) -> Result<()> {
        self.0.write(w)
    }
}

/// Global indices of one transaction's outputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxOutputIndices {
    /// Global index of each output, by local output index.
    pub indices: Vec<u64>,
}

/// Field-by-field builder for [`TxOutputIndices`].
#[derive(Default)]
pub struct TxOutputIndicesBuilder {
    indices: Option<OutputIndexList>,
}

impl EpeeObjectBuilder<TxOutputIndices> for TxOutputIndicesBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "indices" => self.indices = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<TxOutputIndices> {
        Ok(TxOutputIndices {
            indices: self.indices.map(|list| list.0).unwrap_or_default(),
        })
    }
}

impl EpeeObject for TxOutputIndices {
    type Builder = TxOutputIndicesBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[!self.indices.is_empty()])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(OutputIndexList(self.indices), "indices", w)
    }
}

/// Global indices for every transaction of one block; slot 0 is the coinbase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockOutputIndices {
    /// Per-transaction indices, coinbase first.
    pub indices: Vec<TxOutputIndices>,
}

/// Field-by-field builder for [`BlockOutputIndices`].
#[derive(Default)]
pub struct BlockOutputIndicesBuilder {
    indices: Option<Vec<TxOutputIndices>>,
}

impl EpeeObjectBuilder<BlockOutputIndices> for BlockOutputIndicesBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "indices" => self.indices = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<BlockOutputIndices> {
        Ok(BlockOutputIndices {
            indices: self.indices.unwrap_or_default(),
        })
    }
}

impl EpeeObject for BlockOutputIndices {
    type Builder = BlockOutputIndicesBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[self.indices.should_write()])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(self.indices, "indices", w)
    }
}

/// Batched block-fetch response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GetBlocksResponse {
    /// Blocks in chain order.
    pub blocks: Vec<BlockEntry>,
    /// Height of the first returned block.
    pub start_height: u64,
    /// Daemon chain height.
    pub current_height: u64,
    /// Daemon status string.
    pub status: String,
    /// Whether the daemon considers its answer untrusted.
    pub untrusted: bool,
    /// Global output indices, parallel to `blocks`.
    pub output_indices: Vec<BlockOutputIndices>,
}

/// Field-by-field builder for [`GetBlocksResponse`].
#[derive(Default)]
pub struct GetBlocksResponseBuilder {
    blocks: Option<Vec<BlockEntry>>,
    start_height: Option<u64>,
    current_height: Option<u64>,
    status: Option<String>,
    untrusted: Option<bool>,
    output_indices: Option<Vec<BlockOutputIndices>>,
}

impl EpeeObjectBuilder<GetBlocksResponse> for GetBlocksResponseBuilder {
    fn add_field<B: Buf>(&mut self, name: &str, r: &mut B) -> Result<bool> {
        match name {
            "blocks" => self.blocks = Some(read_epee_value(r)?),
            "start_height" => self.start_height = Some(read_epee_value(r)?),
            "current_height" => self.current_height = Some(read_epee_value(r)?),
            "status" => self.status = Some(read_epee_value(r)?),
            "untrusted" => self.untrusted = Some(read_epee_value(r)?),
            "output_indices" => self.output_indices = Some(read_epee_value(r)?),
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn finish(self) -> Result<GetBlocksResponse> {
        Ok(GetBlocksResponse {
            blocks: required(self.blocks, "Required field blocks missing")?,
            start_height: self.start_height.unwrap_or_default(),
            current_height: self.current_height.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            untrusted: self.untrusted.unwrap_or_default(),
            output_indices: self.output_indices.unwrap_or_default(),
        })
    }
}

impl EpeeObject for GetBlocksResponse {
    type Builder = GetBlocksResponseBuilder;

    fn number_of_fields(&self) -> u64 {
        count_present(&[
            self.blocks.should_write(),
            self.start_height.should_write(),
            self.current_height.should_write(),
            self.status.should_write(),
            self.untrusted.should_write(),
            self.output_indices.should_write(),
        ])
    }

    fn write_fields<B: BufMut>(self, w: &mut B) -> Result<()> {
        write_present(self.blocks, "blocks", w)?;
        write_present(self.start_height, "start_height", w)?;
        write_present(self.current_height, "current_height", w)?;
        write_present(self.status, "status", w)?;
        write_present(self.untrusted, "untrusted", w)?;
        write_present(self.output_indices, "output_indices", w)?;
        Ok(())
    }
}

impl GetBlocksResponse {
    /// Decode a portable-storage document.
    ///
    /// Only `blocks` is required; other fields default when absent.
    ///
    /// # Errors
    /// If the document is malformed or a present field has the wrong shape.
    pub fn from_bytes(data: &[u8]) -> std::result::Result<Self, WireError> {
        let response: Self = decode(data)?;
        debug!(
            blocks = response.blocks.len(),
            index_blocks = response.output_indices.len(),
            current_height = response.current_height,
            "Decoded block batch"
        );
        Ok(response)
    }

    /// Encode as a portable-storage document.
    ///
    /// # Errors
    /// If a value is too large for the container.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, WireError> {
        encode(self.clone())
    }

    /// Global indices of the outputs of non-coinbase transaction `position` of block `block`,
    /// read from slot `position + 1`.
    #[must_use]
    pub fn global_index_slot(&self, block: usize, position: usize) -> Option<&[u64]> {
        let slot = position.checked_add(1)?;
        self.output_indices
            .get(block)?
            .indices
            .get(slot)
            .map(|tx| tx.indices.as_slice())
    }

    /// Global index of output `output` of the transaction in slot `tx_slot` (0 = coinbase) of
    /// block `block`.
    #[must_use]
    pub fn global_index(&self, block: usize, tx_slot: usize, output: usize) -> Option<u64> {
        self.output_indices
            .get(block)?
            .indices
            .get(tx_slot)?
            .indices
            .get(output)
            .copied()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "Tests")]

    use super::*;
    use crate::blob::{block_height, parse_block};

    /// `get_blocks.bin` answer for `start_height = 0`, pruned, laid out field for field as the
    /// daemon writes it: the genesis block with its coinbase slot, plus `top_hash` and `credits`.
    const GENESIS_BATCH: &str = concat!(
        "0111010101010201012006626c6f636b738c040c067072756e65640b0105626c6f636b0ae1010100000000",
        "00000000000000000000000000000000000000000000000000000000000010270000013c01ff0001ffff",
        "ffffffff03029b2e4c0281c0b02e7c53291a94d1d0cbff8883f8024f5142ee494ffbbd08807121017767",
        "aafcde9be00dcfd098715ebcf7f410daebc582fda69d24a28e9d0bc890d1000c626c6f636b5f7765696768",
        "740550000000000000000c73746172745f6865696768740500000000000000000e63757272656e745f6865",
        "6967687405a05a320000000000067374617475730a084f4b09756e747275737465640b000e6f7574707574",
        "5f696e64696365738c040407696e64696365738c040407696e64696365738504000000000000000008746f",
        "705f686173680a000763726564697473050000000000000000",
    );

    /// One block whose `txs` are bare blobs and whose indices come packed.
    const BARE_BLOB_BATCH: &str = concat!(
        "0111010101010201010c06626c6f636b738c040805626c6f636b0a0409037478738a040808080e6f75",
        "747075745f696e64696365738c040407696e64696365738c040407696e64696365730a4005000000000000",
        "0006000000000000000e63757272656e745f686569676874053700000000000000",
    );

    mod request {
        use super::*;

        #[test]
        fn default_request_fields() {
            let request = GetBlocksRequest::from_height(2_500_000);
            assert_eq!(request.block_ids, vec![MAINNET_GENESIS_ID]);
            assert_eq!(request.start_height, 2_500_000);
            assert!(request.prune);
            assert!(!request.no_miner_tx);

            let bytes = request.to_bytes().unwrap();
            assert_eq!(bytes[..9], hex!("011101010101020101"));
            assert_eq!(GetBlocksRequest::from_bytes(&bytes).unwrap(), request);
        }

        #[test]
        fn reads_back_what_it_writes() {
            let request = GetBlocksRequest {
                block_ids: vec![[1; 32], MAINNET_GENESIS_ID],
                start_height: 7,
                prune: false,
                no_miner_tx: true,
            };
            let bytes = request.to_bytes().unwrap();
            assert_eq!(GetBlocksRequest::from_bytes(&bytes).unwrap(), request);
        }

        #[test]
        fn rejects_partial_block_id() {
            // block_ids: 33 zero bytes, start_height: 0
            let bytes = hex::decode(concat!(
                "0111010101010201010809626c6f636b5f6964730a84",
                "000000000000000000000000000000000000000000000000000000000000000000",
                "0c73746172745f686569676874050000000000000000",
            ))
            .unwrap();
            let error = GetBlocksRequest::from_bytes(&bytes).unwrap_err();
            assert!(
                matches!(&error, WireError::Epee(Error::Value(message)) if message.contains("got 33")),
                "{error:?}"
            );
        }
    }

    mod response {
        use super::*;

        fn sample() -> GetBlocksResponse {
            GetBlocksResponse {
                blocks: vec![BlockEntry {
                    block: vec![1, 2, 3],
                    txs: vec![
                        TxBlobEntry {
                            blob: vec![4, 5],
                            prunable_hash: Some([6; 32]),
                        },
                        TxBlobEntry {
                            blob: vec![7],
                            prunable_hash: None,
                        },
                    ],
                }],
                start_height: 100,
                current_height: 3_000_000,
                status: "OK".to_owned(),
                untrusted: false,
                output_indices: vec![BlockOutputIndices {
                    indices: vec![
                        TxOutputIndices { indices: vec![10] },
                        TxOutputIndices {
                            indices: vec![11, 12],
                        },
                        TxOutputIndices { indices: vec![13] },
                    ],
                }],
            }
        }

        #[test]
        fn reads_back_what_it_writes() {
            let response = sample();
            let bytes = response.to_bytes().unwrap();
            assert_eq!(GetBlocksResponse::from_bytes(&bytes).unwrap(), response);
        }

        #[test]
        fn global_index_lookup() {
            let response = sample();
            assert_eq!(response.global_index(0, 0, 0), Some(10));
            assert_eq!(response.global_index(0, 1, 1), Some(12));
            assert_eq!(response.global_index(0, 1, 2), None);
            assert_eq!(response.global_index(1, 0, 0), None);
            assert_eq!(response.global_index_slot(0, 0), Some([11, 12].as_slice()));
            assert_eq!(response.global_index_slot(0, 1), Some([13].as_slice()));
            assert_eq!(response.global_index_slot(0, 2), None);
        }

        #[test]
        fn decodes_a_daemon_genesis_batch() {
            let response =
                GetBlocksResponse::from_bytes(&hex::decode(GENESIS_BATCH).unwrap()).unwrap();
            assert_eq!(response.start_height, 0);
            assert_eq!(response.current_height, 3_300_000);
            assert_eq!(response.status, "OK");
            assert!(!response.untrusted);
            assert_eq!(response.blocks.len(), 1);
            assert!(response.blocks[0].txs.is_empty());
            assert_eq!(response.global_index(0, 0, 0), Some(0));

            let block = parse_block(&response.blocks[0].block).unwrap();
            assert_eq!(block_height(&block), Some(0));
            assert_eq!(block.miner_tx.prefix.outputs[0].amount.0, 17_592_186_044_415);
        }

        #[test]
        fn accepts_bare_blob_txs_and_packed_indices() {
            let response =
                GetBlocksResponse::from_bytes(&hex::decode(BARE_BLOB_BATCH).unwrap()).unwrap();
            assert_eq!(response.blocks[0].block, vec![9]);
            assert_eq!(response.blocks[0].txs[0].blob, vec![8, 8]);
            assert_eq!(response.blocks[0].txs[0].prunable_hash, None);
            assert_eq!(response.global_index(0, 0, 1), Some(6));
            assert_eq!(response.current_height, 55);
            assert!(response.status.is_empty());
        }

        #[test]
        fn blocks_are_required() {
            // only current_height: 1
            let bytes = hex::decode("011101010101020101040e63757272656e745f686569676874050100000000000000")
                .unwrap();
            assert!(matches!(
                GetBlocksResponse::from_bytes(&bytes),
                Err(WireError::Epee(Error::Format("Required field blocks missing")))
            ));
        }
    }
}
