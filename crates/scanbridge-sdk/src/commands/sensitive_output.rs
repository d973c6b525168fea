//! Writing result files that tie key images to amounts.

use std::path::Path;

use eyre::Context as _;
use serde::Serialize;
use tokio::io::AsyncWriteExt as _;

/// Serialize `value` as pretty JSON into `path`, readable by the owner only on Unix.
///
/// # Errors
/// Returns an error if serialization fails or the file cannot be created, written or
/// permission-adjusted.
pub(super) async fn write_sensitive_json<T: Serialize>(path: &Path, value: &T) -> eyre::Result<()> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');

    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).truncate(true).write(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;

    // an existing file keeps its old mode through `open`
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;

        tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    }

    Ok(())
}
