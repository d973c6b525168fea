//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

mod blocks_request;
mod key_image;
mod offline;
mod scan;
mod sensitive_output;

pub use blocks_request::blocks_request;
pub use key_image::key_image;
pub use offline::extract_utxos;
pub use scan::scan;

/// Generates and prints the JSON schemas of the request envelopes.
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn request_schemas() -> eyre::Result<()> {
    use scanbridge_core::schema::request::{KeyImageRequest, OfflineRequest, ScanRequest};

    for (name, schema) in [
        ("Scan request", schemars::schema_for!(ScanRequest)),
        ("Offline request", schemars::schema_for!(OfflineRequest)),
        ("Key image request", schemars::schema_for!(KeyImageRequest)),
    ] {
        let schema_str = serde_json::to_string_pretty(&schema)?;
        println!("{name} JSON Schema:\n{schema_str}");
    }
    Ok(())
}
