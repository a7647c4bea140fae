//! NftMetadata contract handle
//!
//! Wraps an [`EthClient`] with the fixed call surface of the NftMetadata
//! contract: the two read functions the gateway forwards to, plus the
//! deployment and configuration helpers used by the integration harness.

use serde_json::Value;
use thiserror::Error;

use crate::eth::artifact::{ArtifactError, ContractArtifact};
use crate::eth::{abi, EthClient, EthError};

const BUILD_METADATA_JSON: &str = "buildMetadataJson(string,string)";
const BUILD_SVG_IMAGE: &str = "buildSvgImage(string,string)";
const SET_NAMESPACE_DATA: &str = "setNamespaceData(string,string,string,string,string)";
const SET_DATA_SERVER_URL: &str = "setDataServerUrl(string)";

/// Errors from contract interaction
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid contract address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Eth(#[from] EthError),

    #[error("ABI error: {0}")]
    Abi(#[from] abi::AbiError),

    #[error("artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("deployment receipt is missing the contract address")]
    MissingContractAddress,
}

/// Handle to a deployed NftMetadata contract
#[derive(Debug, Clone)]
pub struct NftMetadata {
    client: EthClient,
    address: String,
}

impl NftMetadata {
    /// Create a handle for the contract at `address`
    pub fn new(client: EthClient, address: &str) -> Result<Self, ContractError> {
        Ok(Self {
            client,
            address: parse_address(address)?,
        })
    }

    /// Deploy the contract from a compiled artifact and return a handle
    ///
    /// The constructor takes no arguments, so the transaction payload is the
    /// creation bytecode alone.
    pub async fn deploy(
        client: EthClient,
        artifact: &ContractArtifact,
        from: &str,
    ) -> Result<Self, ContractError> {
        let bytecode = artifact.bytecode_bytes()?;
        let hash = client.send_transaction(from, None, &bytecode).await?;
        let receipt = client.wait_for_receipt(&hash).await?;

        let address = receipt
            .get("contractAddress")
            .and_then(Value::as_str)
            .ok_or(ContractError::MissingContractAddress)?
            .to_string();

        Self::new(client, &address)
    }

    /// The (normalized) contract address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The client this handle reads through
    pub fn client(&self) -> &EthClient {
        &self.client
    }

    /// Build the metadata JSON data URI for a name
    pub async fn build_metadata_json(
        &self,
        ns: &str,
        name: &str,
    ) -> Result<String, ContractError> {
        self.call_string(BUILD_METADATA_JSON, &[ns, name]).await
    }

    /// Build the SVG image data URI for a name
    pub async fn build_svg_image(&self, ns: &str, name: &str) -> Result<String, ContractError> {
        self.call_string(BUILD_SVG_IMAGE, &[ns, name]).await
    }

    /// Configure a namespace (owner-only on chain; harness helper)
    pub async fn set_namespace_data(
        &self,
        from: &str,
        ns: &str,
        description: &str,
        url: &str,
        color: &str,
        typ: &str,
    ) -> Result<(), ContractError> {
        self.send(from, SET_NAMESPACE_DATA, &[ns, description, url, color, typ])
            .await
    }

    /// Configure the data-server URL embedded into metadata (harness helper)
    pub async fn set_data_server_url(&self, from: &str, url: &str) -> Result<(), ContractError> {
        self.send(from, SET_DATA_SERVER_URL, &[url]).await
    }

    /// Read-only call returning a single string
    async fn call_string(&self, signature: &str, args: &[&str]) -> Result<String, ContractError> {
        let data = abi::encode_call(abi::selector(signature), args);
        let ret = self.client.call(&self.address, &data).await?;
        Ok(abi::decode_string(&ret)?)
    }

    /// Submit a state-changing call and wait for it to be mined
    async fn send(&self, from: &str, signature: &str, args: &[&str]) -> Result<(), ContractError> {
        let data = abi::encode_call(abi::selector(signature), args);
        let hash = self
            .client
            .send_transaction(from, Some(&self.address), &data)
            .await?;
        self.client.wait_for_receipt(&hash).await?;
        Ok(())
    }
}

/// Validate and normalize a 0x-prefixed 20-byte hex address
fn parse_address(address: &str) -> Result<String, ContractError> {
    let digits = address
        .strip_prefix("0x")
        .ok_or_else(|| ContractError::InvalidAddress(address.to_string()))?;

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ContractError::InvalidAddress(address.to_string()));
    }

    Ok(format!("0x{}", digits.to_ascii_lowercase()))
}
