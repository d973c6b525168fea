//! Standalone key-image computation.

use std::path::PathBuf;

use eyre::Context as _;
use scanbridge_core::schema::request::KeyImageRequest;
use tracing::{info, instrument};

use super::sensitive_output::write_sensitive_json;
use crate::request::read_request;

/// Compute the key image of the output described by `request_file` and write it to `output`.
///
/// # Errors
/// Returns an error if a file cannot be read or written, or if a key in the request is not a
/// curve point.
#[instrument(level = "debug", skip_all)]
pub async fn key_image(request_file: PathBuf, output: PathBuf) -> eyre::Result<()> {
    let request: KeyImageRequest = read_request(&request_file).await?;
    let result = scanbridge_scan::key_image(&request).context("Failed to compute key image")?;

    write_sensitive_json(&output, &result).await?;
    info!(
        file = ?output,
        tx_pub_key = %request.tx_pub_key,
        out_index = request.out_index,
        "Key image written"
    );
    Ok(())
}
