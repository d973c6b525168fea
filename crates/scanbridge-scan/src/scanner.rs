//! Entry points tying decoding, recognition and assembly together.

use std::collections::HashSet;

use scanbridge_core::base::KeyImage;
use scanbridge_core::schema::request::{KeyImageRequest, OfflineRequest, ScanRequest};
use scanbridge_core::schema::response::{KeyImageResponse, ScanResponse, UtxosResponse};
use scanbridge_wire::rpc::{GetBlocksRequest, GetBlocksResponse};
use tracing::{debug, info, warn};

use crate::ScanError;
use crate::assembler::assemble;
use crate::config::ValidatedScanConfig;
use crate::decoder::{DecodedBlock, decode_block};
use crate::mixin::extract_mixins;
use crate::model::{ScannedBlock, Utxo};
use crate::offline::rehydrate;
use crate::pool::BlockPool;
use crate::recognizer::recognize;
use crate::spend::match_spends;
use crate::wallet::WalletKeys;

/// Scan one decoded block: mixins, owned outputs with their global indices, and spends.
///
/// Outputs whose amount cannot be decoded are dropped with a warning.
#[must_use]
pub fn scan_decoded_block(
    block: DecodedBlock,
    keys: &WalletKeys,
    known: &HashSet<KeyImage>,
) -> ScannedBlock {
    let mut mixins = Vec::new();
    let txs = block
        .txs
        .into_iter()
        .map(|decoded| {
            let mut tx = decoded.tx;
            mixins.extend(extract_mixins(&tx, &decoded.global_indices));
            tx.utxos = recognize(&tx, keys)
                .into_iter()
                .filter_map(|result| match result {
                    Ok(utxo) => Some(utxo),
                    Err(error) => {
                        warn!(tx_id = %tx.id, %error, "Dropping owned output");
                        None
                    }
                })
                .filter_map(|utxo| {
                    let global_index = usize::try_from(utxo.vout)
                        .ok()
                        .and_then(|vout| decoded.global_indices.get(vout))?;
                    Some(Utxo {
                        global_index: *global_index,
                        ..utxo
                    })
                })
                .collect();
            tx.spent = match_spends(&decoded.inputs, known);
            tx
        })
        .collect();
    ScannedBlock {
        height: block.height,
        timestamp: block.timestamp,
        txs,
        mixins,
    }
}

/// Scan an already decoded batch response for `keys`, one block per pool task.
///
/// # Errors
/// If the worker pool cannot be built.
pub fn scan_response(
    response: &GetBlocksResponse,
    keys: &WalletKeys,
    known: &HashSet<KeyImage>,
    config: &ValidatedScanConfig,
) -> Result<ScanResponse, ScanError> {
    let pool = BlockPool::new(config)?;
    debug!(
        blocks = response.blocks.len(),
        threads = pool.threads(),
        "Scanning batch"
    );
    let outcomes = pool.run(response.blocks.len(), |index| {
        decode_block(response, index).map(|block| scan_decoded_block(block, keys, known))
    });
    let result = assemble(response.current_height, outcomes);
    info!(
        blocks = result.blocks.len(),
        txs = result.txs.len(),
        current_height = result.current_height,
        "Batch scanned"
    );
    Ok(result)
}

/// Decode a binary batch-fetch response and scan it for the wallet in `request`.
///
/// # Errors
/// If the response envelope is malformed or the worker pool cannot be built. Problems inside
/// individual blocks or transactions only cause them to be skipped.
pub fn scan_blocks(
    response: &[u8],
    request: &ScanRequest,
    config: &ValidatedScanConfig,
) -> Result<ScanResponse, ScanError> {
    let response = GetBlocksResponse::from_bytes(response)?;
    let keys = WalletKeys::from(&request.keys);
    let known: HashSet<KeyImage> = request.key_images.iter().copied().collect();
    scan_response(&response, &keys, &known, config)
}

/// Re-hydrate cached transactions and list the wallet's outputs among them.
///
/// # Errors
/// On the first transaction that fails validation or has an owned output whose amount cannot be
/// decoded.
pub fn extract_utxos(request: &OfflineRequest) -> Result<UtxosResponse, ScanError> {
    let keys = WalletKeys::from(&request.keys);
    let mut outputs = Vec::new();
    for (index, desc) in request.txs.iter().enumerate() {
        let tx = rehydrate(desc).map_err(|source| ScanError::Rehydrate { index, source })?;
        for utxo in recognize(&tx, &keys) {
            outputs.push(utxo?.to_cached_record());
        }
    }
    debug!(
        txs = request.txs.len(),
        outputs = outputs.len(),
        "Cached transactions scanned"
    );
    Ok(UtxosResponse { outputs })
}

/// Key image of one output, assuming it pays to the wallet in `request`.
///
/// # Errors
/// If the transaction key or the public spend key is not a curve point.
pub fn key_image(request: &KeyImageRequest) -> Result<KeyImageResponse, ScanError> {
    let keys = WalletKeys::from(&request.keys);
    let key_image = keys.key_image(&request.tx_pub_key, request.out_index)?;
    Ok(KeyImageResponse { key_image })
}

/// Binary batch-fetch request starting at `start_height`.
///
/// # Errors
/// If encoding fails.
pub fn blocks_request(start_height: u64) -> Result<Vec<u8>, ScanError> {
    Ok(GetBlocksRequest::from_height(start_height).to_bytes()?)
}
