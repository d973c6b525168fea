//! Re-scanning cached transactions without chain access.

use std::path::PathBuf;

use eyre::Context as _;
use scanbridge_core::schema::request::OfflineRequest;
use tracing::{info, instrument};

use super::sensitive_output::write_sensitive_json;
use crate::request::read_request;

/// List the wallet's outputs among the cached transactions in `request_file` and write them to
/// `output`.
///
/// # Errors
/// Returns an error if a file cannot be read or written, or if any cached transaction is
/// malformed. Nothing is written in that case.
#[instrument(level = "debug", skip_all)]
pub async fn extract_utxos(request_file: PathBuf, output: PathBuf) -> eyre::Result<()> {
    let request: OfflineRequest = read_request(&request_file).await?;
    info!(txs = request.txs.len(), "Extracting outputs from cached transactions...");

    let result = scanbridge_scan::extract_utxos(&request)
        .context("Failed to extract outputs from cached transactions")?;

    write_sensitive_json(&output, &result).await?;
    info!(file = ?output, outputs = result.outputs.len(), "Outputs written");
    Ok(())
}
