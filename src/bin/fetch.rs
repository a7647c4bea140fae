//! nftmetad_fetch - One-shot metadata inspection tool
//!
//! Reads both contract functions for a single name directly from the node,
//! checks the data URI shapes, prints the metadata JSON, and can write the
//! rasterized PNG to a file.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nftmetad::contract::NftMetadata;
use nftmetad::datauri::DataUri;
use nftmetad::eth::EthClient;
use nftmetad::images;

/// Fetch NFT metadata and image for a name from the NftMetadata contract
#[derive(Parser, Debug)]
#[command(
    name = "nftmetad_fetch",
    version,
    about = "Fetch NFT metadata for a single name"
)]
struct Args {
    /// URL for the Ethereum JSON-RPC interface to use
    #[arg(long)]
    eth_rpc_url: String,

    /// NftMetadata contract address to use
    #[arg(long)]
    contract_address: String,

    /// Namespace of the name to fetch
    #[arg(long)]
    ns: String,

    /// Name to fetch
    #[arg(long)]
    name: String,

    /// If set, write the rasterized PNG image to this file
    #[arg(long)]
    write_image: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nftmetad=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let client = EthClient::new(&args.eth_rpc_url)?;
    let contract = NftMetadata::new(client, &args.contract_address)?;

    // Metadata: must be base64 JSON.
    let uri = contract.build_metadata_json(&args.ns, &args.name).await?;
    let data = DataUri::parse(&uri)?;
    if data.mime != "application/json" {
        bail!("metadata has unexpected mime type: {}", data.mime);
    }

    let metadata: serde_json::Value = serde_json::from_slice(&data.payload)?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);

    // Image: must be base64 SVG; rasterizing also validates the markup.
    let uri = contract.build_svg_image(&args.ns, &args.name).await?;
    let data = DataUri::parse(&uri)?;
    if data.mime != "image/svg+xml" {
        bail!("image has unexpected mime type: {}", data.mime);
    }

    let png = images::svg_to_png(&data.payload)?;

    if let Some(path) = &args.write_image {
        std::fs::write(path, &png)?;
        println!(
            "PNG for {}/{} written to {} ({} bytes)",
            args.ns,
            args.name,
            path.display(),
            png.len()
        );
    }

    Ok(())
}
