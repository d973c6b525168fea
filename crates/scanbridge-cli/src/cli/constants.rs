//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Scan
pub const SCANBRIDGE_BLOCKS_FILE: &str = "SCANBRIDGE_BLOCKS_FILE";
pub const SCANBRIDGE_KEY_IMAGES_FILE: &str = "SCANBRIDGE_KEY_IMAGES_FILE";
pub const SCANBRIDGE_WORKER_THREADS: &str = "SCANBRIDGE_WORKER_THREADS";
pub const SCANBRIDGE_SCAN_OUT: &str = "SCANBRIDGE_SCAN_OUT";

// Request envelopes
pub const SCANBRIDGE_REQUEST_FILE: &str = "SCANBRIDGE_REQUEST_FILE";
pub const SCANBRIDGE_OFFLINE_REQUEST_FILE: &str = "SCANBRIDGE_OFFLINE_REQUEST_FILE";
pub const SCANBRIDGE_KEY_IMAGE_REQUEST_FILE: &str = "SCANBRIDGE_KEY_IMAGE_REQUEST_FILE";

// Outputs
pub const SCANBRIDGE_UTXOS_OUT: &str = "SCANBRIDGE_UTXOS_OUT";
pub const SCANBRIDGE_KEY_IMAGE_OUT: &str = "SCANBRIDGE_KEY_IMAGE_OUT";
pub const SCANBRIDGE_BLOCKS_REQUEST_OUT: &str = "SCANBRIDGE_BLOCKS_REQUEST_OUT";

// Block batch request
pub const SCANBRIDGE_START_HEIGHT: &str = "SCANBRIDGE_START_HEIGHT";

// -------------------------
// Default file names
// -------------------------

pub const DEFAULT_BLOCKS_FILE: &str = "blocks.bin";
pub const DEFAULT_REQUEST_FILE: &str = "scan_request.json";
pub const DEFAULT_OFFLINE_REQUEST_FILE: &str = "offline_request.json";
pub const DEFAULT_KEY_IMAGE_REQUEST_FILE: &str = "key_image_request.json";
pub const DEFAULT_SCAN_OUT: &str = "scan_result.json";
pub const DEFAULT_UTXOS_OUT: &str = "utxos.json";
pub const DEFAULT_KEY_IMAGE_OUT: &str = "key_image.json";
pub const DEFAULT_BLOCKS_REQUEST_OUT: &str = "blocks_request.bin";
