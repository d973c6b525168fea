//! Reading request envelopes that carry wallet secrets.

use std::path::Path;

use eyre::Context as _;
use secrecy::{ExposeSecret as _, SecretString};
use serde::de::DeserializeOwned;

/// Read a file that holds secret key material without leaving a plain copy behind.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub async fn read_secret_file(path: &Path) -> eyre::Result<SecretString> {
    let mut text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let secret = SecretString::new(text.trim().to_owned().into_boxed_str());
    zeroize::Zeroize::zeroize(&mut text);
    Ok(secret)
}

/// Read and parse a JSON request envelope that contains wallet keys.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid envelope.
pub async fn read_request<T: DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let text = read_secret_file(path).await?;
    serde_json::from_str(text.expose_secret())
        .with_context(|| format!("Invalid request envelope {}", path.display()))
}
