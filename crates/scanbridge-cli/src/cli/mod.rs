//! Command-line interface for the `scanbridge` CLI application.

pub mod constants;

use std::path::PathBuf;

use self::constants::{
    DEFAULT_BLOCKS_FILE, DEFAULT_BLOCKS_REQUEST_OUT, DEFAULT_KEY_IMAGE_OUT,
    DEFAULT_KEY_IMAGE_REQUEST_FILE, DEFAULT_OFFLINE_REQUEST_FILE, DEFAULT_REQUEST_FILE,
    DEFAULT_SCAN_OUT, DEFAULT_UTXOS_OUT, SCANBRIDGE_BLOCKS_FILE, SCANBRIDGE_BLOCKS_REQUEST_OUT,
    SCANBRIDGE_KEY_IMAGE_OUT, SCANBRIDGE_KEY_IMAGE_REQUEST_FILE, SCANBRIDGE_KEY_IMAGES_FILE,
    SCANBRIDGE_OFFLINE_REQUEST_FILE, SCANBRIDGE_REQUEST_FILE, SCANBRIDGE_SCAN_OUT,
    SCANBRIDGE_START_HEIGHT, SCANBRIDGE_UTXOS_OUT, SCANBRIDGE_WORKER_THREADS,
};

/// Command-line interface definition.
#[derive(Debug, clap::Parser)]
#[command(name = "scanbridge")]
#[command(about = "Monero light-wallet scanning tools")]
pub struct Cli {
    /// CLI command.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Scan a binary block batch for a wallet's outputs and spends.
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },
    /// List a wallet's outputs among cached transaction descriptions.
    ExtractUtxos {
        #[command(flatten)]
        args: ExtractUtxosArgs,
    },
    /// Write the binary block batch request for a start height.
    BlocksRequest {
        #[command(flatten)]
        args: BlocksRequestArgs,
    },
    /// Compute the key image of a single output.
    KeyImage {
        #[command(flatten)]
        args: KeyImageArgs,
    },
    /// Print the JSON schemas of the request envelopes.
    Schema,
}

/// Arguments for `scanbridge scan`.
#[derive(Debug, clap::Args)]
pub struct ScanArgs {
    /// Binary block batch response, as returned by the daemon.
    #[arg(long, env = SCANBRIDGE_BLOCKS_FILE, default_value = DEFAULT_BLOCKS_FILE)]
    pub blocks: PathBuf,

    /// Scan request envelope with the wallet keys and known key images.
    #[arg(long, env = SCANBRIDGE_REQUEST_FILE, default_value = DEFAULT_REQUEST_FILE)]
    pub request: PathBuf,

    /// Additional known key images (JSON array of hex strings).
    #[arg(long, env = SCANBRIDGE_KEY_IMAGES_FILE)]
    pub key_images: Option<PathBuf>,

    /// Number of worker threads. Defaults to the available parallelism.
    #[arg(long, env = SCANBRIDGE_WORKER_THREADS)]
    pub worker_threads: Option<usize>,

    /// Output file for the scan result.
    #[arg(long, env = SCANBRIDGE_SCAN_OUT, default_value = DEFAULT_SCAN_OUT)]
    pub output: PathBuf,
}

/// Arguments for `scanbridge extract-utxos`.
#[derive(Debug, clap::Args)]
pub struct ExtractUtxosArgs {
    /// Offline request envelope with the wallet keys and cached transactions.
    #[arg(long, env = SCANBRIDGE_OFFLINE_REQUEST_FILE, default_value = DEFAULT_OFFLINE_REQUEST_FILE)]
    pub request: PathBuf,

    /// Output file for the owned outputs.
    #[arg(long, env = SCANBRIDGE_UTXOS_OUT, default_value = DEFAULT_UTXOS_OUT)]
    pub output: PathBuf,
}

/// Arguments for `scanbridge blocks-request`.
#[derive(Debug, clap::Args)]
pub struct BlocksRequestArgs {
    /// First block height to fetch.
    #[arg(long, env = SCANBRIDGE_START_HEIGHT)]
    pub start_height: u64,

    /// Output file for the binary request body.
    #[arg(long, env = SCANBRIDGE_BLOCKS_REQUEST_OUT, default_value = DEFAULT_BLOCKS_REQUEST_OUT)]
    pub output: PathBuf,
}

/// Arguments for `scanbridge key-image`.
#[derive(Debug, clap::Args)]
pub struct KeyImageArgs {
    /// Key image request envelope.
    #[arg(long, env = SCANBRIDGE_KEY_IMAGE_REQUEST_FILE, default_value = DEFAULT_KEY_IMAGE_REQUEST_FILE)]
    pub request: PathBuf,

    /// Output file for the key image.
    #[arg(long, env = SCANBRIDGE_KEY_IMAGE_OUT, default_value = DEFAULT_KEY_IMAGE_OUT)]
    pub output: PathBuf,
}
