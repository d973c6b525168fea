//! scanbridge CLI Application

mod cli;

use clap::Parser as _;
use cli::{Cli, Commands};

fn init_tracing() -> eyre::Result<()> {
    #[cfg(feature = "tokio-console")]
    {
        // tokio-console: layers the console subscriber with fmt
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(console_subscriber::spawn())
            .with(
                tracing_subscriber::fmt::layer().with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                ),
            )
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    #[cfg(not(feature = "tokio-console"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Scan { args } => {
            scanbridge_sdk::commands::scan(
                args.blocks,
                args.request,
                args.key_images,
                args.worker_threads,
                args.output,
            )
            .await
        }
        Commands::ExtractUtxos { args } => {
            scanbridge_sdk::commands::extract_utxos(args.request, args.output).await
        }
        Commands::BlocksRequest { args } => {
            scanbridge_sdk::commands::blocks_request(args.start_height, args.output).await
        }
        Commands::KeyImage { args } => {
            scanbridge_sdk::commands::key_image(args.request, args.output).await
        }
        Commands::Schema => scanbridge_sdk::commands::request_schemas(),
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
