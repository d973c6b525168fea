//! Building the binary batch-fetch request body.

use std::path::PathBuf;

use eyre::Context as _;
use tracing::{info, instrument};

/// Write the binary batch-fetch request for blocks from `start_height` onward to `output`.
///
/// The body is meant to be posted unchanged to the daemon's binary block endpoint.
///
/// # Errors
/// Returns an error if encoding fails or the file cannot be written.
#[instrument(level = "debug", skip_all, fields(start_height = start_height))]
pub async fn blocks_request(start_height: u64, output: PathBuf) -> eyre::Result<()> {
    let body = scanbridge_scan::blocks_request(start_height)
        .context("Failed to encode block batch request")?;
    tokio::fs::write(&output, &body)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(file = ?output, bytes = body.len(), "Block batch request written");
    Ok(())
}
