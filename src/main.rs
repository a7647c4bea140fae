//! nftmetad - NFT metadata gateway daemon

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use nftmetad::{Config, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Webserver that forwards NFT metadata from the NftMetadata contract
#[derive(Parser, Debug)]
#[command(name = "nftmetad", version, about = "NFT metadata gateway daemon")]
struct Args {
    /// Address to listen on for HTTP connections
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// URL for the Ethereum JSON-RPC interface to use
    #[arg(long)]
    eth_rpc_url: String,

    /// NftMetadata contract address to use
    #[arg(long)]
    contract_address: String,

    /// Expected prefix of request paths
    #[arg(long, default_value = "/")]
    path_prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nftmetad=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = Config {
        bind_addr: args.bind,
        eth_rpc_url: args.eth_rpc_url,
        contract_address: args.contract_address,
        path_prefix: args.path_prefix,
    };

    // Create and run server
    let server = Server::new(config).await?;
    server.run().await?;

    Ok(())
}
