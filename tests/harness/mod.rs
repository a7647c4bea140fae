//! Integration Test Harness
//!
//! Test infrastructure for nftmetad:
//! - `MockChain` - In-process JSON-RPC stub standing in for an Ethereum node
//! - `AnvilProcess` - Spawns a real local anvil chain (chain tests)
//! - `GatewayTest` - Runs the gateway against a chain on a random port
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::GatewayTest;
//!
//! #[tokio::test]
//! async fn test_metadata() {
//!     let gateway = GatewayTest::start().await.unwrap();
//!     let resp = gateway.get("/metadata/70/646F6D6F62").await.unwrap();
//!     assert_eq!(resp.status(), 200);
//! }
//! ```

mod chain;

// Primary exports
#[allow(unused_imports)]
pub use chain::{AnvilProcess, MockChain};
#[allow(unused_imports)]
pub use server::GatewayTest;
