//! Chain backends for gateway tests
//!
//! `MockChain` is an in-process JSON-RPC stub that answers `eth_chainId`
//! and `eth_call` the way the NftMetadata contract would, so the full
//! gateway path runs without external processes. `AnvilProcess` spawns a
//! real local chain for the ignored end-to-end contract test.

use std::net::SocketAddr;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

use anyhow::Result;
use axum::{routing::post, Json, Router};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use nftmetad::eth::{abi, from_hex, to_hex, EthClient};

/// In-process JSON-RPC stub standing in for an Ethereum node
pub struct MockChain {
    addr: SocketAddr,
    _handle: JoinHandle<()>,
}

impl MockChain {
    /// Start the stub on a random port
    pub async fn start() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let router = Router::new().route("/", post(rpc_handler));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                eprintln!("Mock chain error: {}", e);
            }
        });

        Ok(Self {
            addr,
            _handle: handle,
        })
    }

    /// JSON-RPC endpoint URL
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The contract address the stub pretends to host
    pub fn contract_address(&self) -> &'static str {
        "0x00000000000000000000000000000000000000cd"
    }
}

/// Handle one JSON-RPC request
async fn rpc_handler(Json(request): Json<Value>) -> Json<Value> {
    let id = request["id"].clone();
    let method = request["method"].as_str().unwrap_or_default();

    match dispatch(method, &request["params"]) {
        Ok(result) => Json(json!({"jsonrpc": "2.0", "id": id, "result": result})),
        Err(message) => Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": {"code": 3, "message": message},
        })),
    }
}

fn dispatch(method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "eth_chainId" => Ok(json!("0x7a69")),
        "eth_call" => eth_call(params),
        _ => Err(format!("method {} not supported", method)),
    }
}

/// Decode the calldata and synthesize the contract's reply
///
/// Behavior hooks for error-path tests are keyed on the namespace:
/// `revert` fails the call, `garbage` returns a non-data-URI string,
/// `badb64` returns a data URI with broken base64, and `badsvg` returns
/// an image payload that is not SVG.
fn eth_call(params: &Value) -> Result<Value, String> {
    let data = params[0]["data"].as_str().ok_or("missing call data")?;
    let calldata = from_hex(data).map_err(|e| e.to_string())?;
    if calldata.len() < 4 {
        return Err("calldata too short".to_string());
    }

    let args = abi::decode_string_args(&calldata).map_err(|e| e.to_string())?;
    if args.len() != 2 {
        return Err("expected two string arguments".to_string());
    }
    let (ns, name) = (args[0].as_str(), args[1].as_str());

    if ns == "revert" {
        return Err("execution reverted".to_string());
    }

    let uri = if ns == "garbage" {
        "this is not a data uri".to_string()
    } else if ns == "badb64" {
        "data:application/json;base64,!!!".to_string()
    } else if calldata[..4] == abi::selector("buildMetadataJson(string,string)") {
        metadata_uri(ns, name)
    } else if calldata[..4] == abi::selector("buildSvgImage(string,string)") {
        image_uri(ns, name)
    } else {
        return Err("unknown selector".to_string());
    };

    Ok(json!(encode_string_return(&uri)))
}

/// ABI-encode a single string return value
fn encode_string_return(value: &str) -> String {
    // A single-string return is laid out exactly like a single-string
    // argument list, minus the selector.
    let encoded = abi::encode_call([0; 4], &[value]);
    to_hex(&encoded[4..])
}

/// Metadata JSON in the shape the real contract produces
fn metadata_uri(ns: &str, name: &str) -> String {
    let metadata = json!({
        "name": format!("{}/{}", ns, name),
        "image": format!(
            "https://data.server/image/{}/{}",
            hex::encode_upper(ns),
            hex::encode_upper(name)
        ),
        "description": "player accounts",
        "attributes": [
            {"trait_type": "Namespace", "value": ns},
            {"trait_type": "Name", "value": name},
            {"trait_type": "Type", "value": "player"},
        ],
    });

    format!(
        "data:application/json;base64,{}",
        BASE64.encode(metadata.to_string())
    )
}

/// A small SVG with the name as text, like the contract draws
fn image_uri(ns: &str, name: &str) -> String {
    if ns == "badsvg" {
        return format!(
            "data:image/svg+xml;base64,{}",
            BASE64.encode("not an svg document")
        );
    }

    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="350" height="350"><rect width="350" height="350" fill="#ff0000"/><text x="175" y="175" text-anchor="middle">{}/{}</text></svg>"##,
        xml_escape(ns),
        xml_escape(name)
    );

    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A real local anvil chain as a child process
pub struct AnvilProcess {
    child: Child,
    port: u16,
}

impl AnvilProcess {
    /// Spawn anvil on a random port and wait until it answers
    pub async fn start() -> Result<Self> {
        // Find a random available port
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        drop(listener);

        let child = Command::new("anvil")
            .args(["--host", "127.0.0.1", "--port", &port.to_string(), "--silent"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| anyhow::anyhow!("Failed to spawn anvil: {}", e))?;

        let process = Self { child, port };

        // Poll until the node answers (max 5 seconds)
        let client = EthClient::new(&process.url())?;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if client.chain_id().await.is_ok() {
                return Ok(process);
            }
        }

        anyhow::bail!("anvil failed to start within 5 seconds")
    }

    /// JSON-RPC endpoint URL
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }
}

impl Drop for AnvilProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
