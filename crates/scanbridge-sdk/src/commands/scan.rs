//! Scanning a binary block batch.

use std::collections::HashSet;
use std::path::PathBuf;

use eyre::Context as _;
use scanbridge_core::base::KeyImage;
use scanbridge_core::schema::request::ScanRequest;
use scanbridge_scan::{ScanConfig, scan_blocks};
use tracing::{info, instrument};

use super::sensitive_output::write_sensitive_json;
use crate::request::read_request;

/// Scan the batch-fetch response in `blocks_file` for the wallet described by `request_file` and
/// write the scan result to `output`.
///
/// Extra key images from `key_images_file` (a JSON array of hex strings) are merged into the ones
/// carried by the request.
///
/// # Errors
/// Returns an error if a file cannot be read or written, the request or response is malformed,
/// or the configuration is invalid.
#[instrument(level = "debug", skip_all, fields(blocks = %blocks_file.display()))]
pub async fn scan(
    blocks_file: PathBuf,
    request_file: PathBuf,
    key_images_file: Option<PathBuf>,
    worker_threads: Option<usize>,
    output: PathBuf,
) -> eyre::Result<()> {
    let config = worker_threads
        .map_or_else(ScanConfig::default, ScanConfig::new)
        .validate()?;
    let mut request: ScanRequest = read_request(&request_file).await?;
    if let Some(path) = key_images_file {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let extra: Vec<KeyImage> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid key image list {}", path.display()))?;
        let known: HashSet<KeyImage> = request.key_images.iter().copied().collect();
        request
            .key_images
            .extend(extra.into_iter().filter(|image| !known.contains(image)));
    }
    let blocks = tokio::fs::read(&blocks_file)
        .await
        .with_context(|| format!("Failed to read {}", blocks_file.display()))?;

    info!(
        bytes = blocks.len(),
        key_images = request.key_images.len(),
        spend_key = %request.keys.pub_spend_key,
        "Scanning block batch..."
    );
    let result = tokio::task::spawn_blocking(move || scan_blocks(&blocks, &request, &config))
        .await?
        .context("Failed to scan block batch")?;

    write_sensitive_json(&output, &result).await?;
    info!(
        file = ?output,
        txs = result.txs.len(),
        blocks = result.blocks.len(),
        current_height = result.current_height,
        "Scan result written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::indexing_slicing, reason = "Tests")]

    use scanbridge_core::schema::response::ScanResponse;
    use scanbridge_wire::blob::RctType;
    use test_utils::{ChainBuilder, TestWallet, TxBuilder};

    use super::*;

    struct Fixture {
        _dir: tempfile::TempDir,
        blocks: PathBuf,
        request: PathBuf,
        output: PathBuf,
    }

    async fn fixture(key_images: Vec<KeyImage>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let wallet = TestWallet::from_seed(5);
        let tx = TxBuilder::v2(RctType::Clsag)
            .spend(KeyImage::new([8; 32]), 0)
            .pay(&wallet, 2_500)
            .build();
        let blocks = dir.path().join("blocks.bin");
        tokio::fs::write(
            &blocks,
            ChainBuilder::new(0)
                .block(300, vec![tx])
                .current_height(301)
                .to_bytes(),
        )
        .await
        .unwrap();
        let request = dir.path().join("request.json");
        let envelope = ScanRequest {
            keys: wallet.descriptor(),
            key_images,
        };
        tokio::fs::write(&request, serde_json::to_string(&envelope).unwrap())
            .await
            .unwrap();
        Fixture {
            blocks,
            request,
            output: dir.path().join("scan.json"),
            _dir: dir,
        }
    }

    async fn read_result(path: &PathBuf) -> ScanResponse {
        serde_json::from_str(&tokio::fs::read_to_string(path).await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn writes_scan_result() {
        let files = fixture(Vec::new()).await;
        scan(
            files.blocks.clone(),
            files.request.clone(),
            None,
            Some(2),
            files.output.clone(),
        )
        .await
        .unwrap();

        let result = read_result(&files.output).await;
        assert_eq!(result.current_height, 301);
        assert_eq!(result.txs.len(), 1);
        assert_eq!(result.txs[0].utxos[0].amount, 2_500);
        assert!(result.txs[0].inputs.is_empty());
    }

    #[tokio::test]
    async fn merges_key_image_file() {
        let files = fixture(Vec::new()).await;
        let images = files.request.with_file_name("images.json");
        tokio::fs::write(&images, format!("[\"{}\"]", "08".repeat(32)))
            .await
            .unwrap();
        scan(
            files.blocks.clone(),
            files.request.clone(),
            Some(images),
            None,
            files.output.clone(),
        )
        .await
        .unwrap();

        let result = read_result(&files.output).await;
        assert_eq!(result.txs[0].inputs, vec![KeyImage::new([8; 32])]);
    }

    #[tokio::test]
    async fn zero_workers_is_rejected() {
        let files = fixture(Vec::new()).await;
        let err = scan(files.blocks, files.request, None, Some(0), files.output.clone())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero"), "{err}");
        assert!(!files.output.exists());
    }

    #[tokio::test]
    async fn garbage_batch_is_rejected() {
        let files = fixture(Vec::new()).await;
        tokio::fs::write(&files.blocks, b"not epee").await.unwrap();
        assert!(
            scan(files.blocks, files.request, None, None, files.output)
                .await
                .is_err()
        );
    }
}
