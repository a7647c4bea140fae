//! Compiled-contract artifact loading
//!
//! Reads the JSON file produced by the Solidity toolchain. Only the creation
//! bytecode is used (for the deployment helpers); the ABI of the NftMetadata
//! contract is fixed, so the `abi` field stays opaque.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::EthError;

/// Errors from reading an artifact file
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid bytecode: {0}")]
    Bytecode(#[from] EthError),
}

/// A compiled contract as written by forge or truffle
#[derive(Debug, Deserialize)]
pub struct ContractArtifact {
    #[serde(default)]
    pub abi: serde_json::Value,

    pub bytecode: Bytecode,
}

/// Creation bytecode field
///
/// Forge nests the hex under `object`, truffle stores it as a plain string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Bytecode {
    Forge { object: String },
    Plain(String),
}

impl ContractArtifact {
    /// Load an artifact from a JSON file
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// The creation bytecode as raw bytes
    pub fn bytecode_bytes(&self) -> Result<Vec<u8>, ArtifactError> {
        let hex_str = match &self.bytecode {
            Bytecode::Forge { object } => object,
            Bytecode::Plain(raw) => raw,
        };
        Ok(super::from_hex(hex_str)?)
    }
}
