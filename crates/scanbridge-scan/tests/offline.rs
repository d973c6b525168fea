//! Cached-transaction scanning and the standalone helpers.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    missing_docs,
    reason = "Tests"
)]

use scanbridge_core::schema::request::{KeyImageRequest, OfflineRequest, OfflineTxDescriptor};
use scanbridge_core::schema::response::UtxoOrigin;
use scanbridge_scan::{RehydrateError, ScanError, blocks_request, extract_utxos, key_image};
use scanbridge_wire::blob::RctType;
use scanbridge_wire::rpc::{GetBlocksRequest, MAINNET_GENESIS_ID};
use test_utils::{TestWallet, TxBuilder, describe_offline, tx_id};

fn wallet() -> TestWallet {
    TestWallet::from_seed(11)
}

fn offline_request(txs: Vec<OfflineTxDescriptor>) -> OfflineRequest {
    OfflineRequest {
        keys: wallet().descriptor(),
        txs,
    }
}

#[test]
fn extracts_owned_outputs_in_request_order() {
    let first = TxBuilder::v2(RctType::BulletproofPlus)
        .pay(&wallet(), 10)
        .pay_seed(3, 20)
        .build();
    let second = TxBuilder::v2(RctType::Bulletproof)
        .tx_secret_seed(2)
        .pay_seed(3, 30)
        .pay(&wallet(), 40)
        .build();
    let request = offline_request(vec![describe_offline(&first), describe_offline(&second)]);
    let response = extract_utxos(&request).unwrap();

    let found: Vec<(u64, u64)> = response
        .outputs
        .iter()
        .map(|utxo| (utxo.vout, utxo.amount))
        .collect();
    assert_eq!(found, vec![(0, 10), (1, 40)]);
    assert_eq!(
        response.outputs[1].origin,
        UtxoOrigin::Cached {
            tx_id: tx_id(&second)
        }
    );
}

#[test]
fn invalid_rct_type_is_a_validation_error() {
    let tx = TxBuilder::v2(RctType::Clsag).pay(&wallet(), 10).build();
    let mut desc = describe_offline(&tx);
    desc.rv.rct_type = 99;
    let error = extract_utxos(&offline_request(vec![describe_offline(&tx), desc])).unwrap_err();
    assert!(matches!(
        error,
        ScanError::Rehydrate {
            index: 1,
            source: RehydrateError::UnknownRctType(99)
        }
    ));
}

#[test]
fn commitment_mismatch_fails_the_request() {
    let tx = TxBuilder::v2(RctType::Clsag).pay(&wallet(), 10).build();
    let mut desc = describe_offline(&tx);
    desc.rv.out_pk[0].mask = "00".repeat(32);
    assert!(matches!(
        extract_utxos(&offline_request(vec![desc])),
        Err(ScanError::Crypto(_))
    ));
}

#[test]
fn nothing_owned_is_empty() {
    let tx = TxBuilder::v2(RctType::Clsag).pay_seed(3, 10).build();
    let response = extract_utxos(&offline_request(vec![describe_offline(&tx)])).unwrap();
    assert!(response.outputs.is_empty());
}

#[test]
fn key_image_matches_extracted_output() {
    let builder = TxBuilder::v2(RctType::Clsag)
        .pay_seed(3, 1)
        .pay(&wallet(), 10);
    let tx = builder.build();
    let extracted = extract_utxos(&offline_request(vec![describe_offline(&tx)])).unwrap();

    let request = KeyImageRequest {
        keys: wallet().descriptor(),
        tx_pub_key: builder.tx_pub(),
        out_index: 1,
    };
    assert_eq!(
        key_image(&request).unwrap().key_image,
        extracted.outputs[0].key_image
    );
}

#[test]
fn blocks_request_is_pruned_from_genesis() {
    let bytes = blocks_request(1_234).unwrap();
    let request = GetBlocksRequest::from_bytes(&bytes).unwrap();
    assert_eq!(request.start_height, 1_234);
    assert!(request.prune);
    assert!(!request.no_miner_tx);
    assert_eq!(request.block_ids, vec![MAINNET_GENESIS_ID]);
}
