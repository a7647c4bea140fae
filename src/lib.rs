//! nftmetad - NFT metadata gateway daemon
//!
//! Forwards NFT metadata and image requests to the on-chain NftMetadata
//! contract and serves the decoded payloads over HTTP.

pub mod api;
pub mod contract;
pub mod datauri;
pub mod eth;
pub mod images;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use contract::NftMetadata;
use eth::EthClient;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub eth_rpc_url: String,
    pub contract_address: String,
    pub path_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            eth_rpc_url: "http://127.0.0.1:8545".to_string(),
            contract_address: String::new(),
            path_prefix: "/".to_string(),
        }
    }
}

/// The nftmetad server instance
pub struct Server {
    config: Config,
    contract: Arc<NftMetadata>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a new server instance
    ///
    /// Connects to the Ethereum node to verify it is reachable and logs the
    /// chain id before any request is served.
    pub async fn new(config: Config) -> Result<Self> {
        let client = EthClient::new(&config.eth_rpc_url)?;

        let chain_id = client.chain_id().await?;
        info!("Connected to Ethereum chain ID {}", chain_id);

        let contract = NftMetadata::new(client, &config.contract_address)?;
        info!("Using NftMetadata contract at {}", contract.address());

        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            contract: Arc::new(contract),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// Get the contract handle
    pub fn contract(&self) -> Arc<NftMetadata> {
        self.contract.clone()
    }

    /// Build the router
    fn router(&self) -> Router {
        api::router(self.contract.clone(), &self.config.path_prefix)
    }

    /// Run the server until shutdown
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("nftmetad listening on {}", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                shutdown_rx.changed().await.ok();
            })
            .await?;

        info!("nftmetad shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
