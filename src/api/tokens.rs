//! Token data endpoint
//!
//! GET /{kind}/{ns_hex}/{name_hex} - Resolve metadata or image for a name
//!
//! `kind` selects the contract read function; `ns_hex` and `name_hex` are
//! hex encodings of the UTF-8 namespace and name. The contract's data URI
//! reply is decoded and its payload served back, with SVG images
//! rasterized to PNG first.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tracing::warn;

use super::AppState;
use crate::datauri::DataUri;
use crate::images;

/// Build the tokens router
pub fn router() -> Router<AppState> {
    Router::new().route("/{kind}/{ns_hex}/{name_hex}", get(get_token_data))
}

/// Which contract read function a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Metadata,
    Image,
}

/// A parsed and validated token-data request
#[derive(Debug, PartialEq, Eq)]
struct TokenRequest {
    kind: TokenKind,
    ns: String,
    name: String,
}

impl TokenRequest {
    /// Parse the path components of a request
    fn parse(kind: &str, ns_hex: &str, name_hex: &str) -> Result<Self, &'static str> {
        let kind = match kind {
            "metadata" => TokenKind::Metadata,
            "image" => TokenKind::Image,
            _ => return Err("invalid request type"),
        };

        let ns = decode_hex_utf8(ns_hex)?;
        let name = decode_hex_utf8(name_hex)?;

        Ok(Self { kind, ns, name })
    }
}

/// Decode a hex path component into the UTF-8 string it encodes
fn decode_hex_utf8(component: &str) -> Result<String, &'static str> {
    let bytes = hex::decode(component).map_err(|_| "ns and/or name are invalid hex encoded")?;
    String::from_utf8(bytes).map_err(|_| "ns and/or name are not valid UTF-8")
}

/// Resolve a token-data request against the contract
async fn get_token_data(
    Path((kind, ns_hex, name_hex)): Path<(String, String, String)>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let request = match TokenRequest::parse(&kind, &ns_hex, &name_hex) {
        Ok(request) => request,
        Err(msg) => return (StatusCode::NOT_FOUND, msg).into_response(),
    };

    let result = match request.kind {
        TokenKind::Metadata => {
            state
                .contract
                .build_metadata_json(&request.ns, &request.name)
                .await
        }
        TokenKind::Image => {
            state
                .contract
                .build_svg_image(&request.ns, &request.name)
                .await
        }
    };

    let uri = match result {
        Ok(uri) => uri,
        Err(e) => {
            warn!("Contract call for {}/{} failed: {}", request.ns, request.name, e);
            return (StatusCode::BAD_GATEWAY, "contract call failed").into_response();
        }
    };

    let data = match DataUri::parse(&uri) {
        Ok(data) => data,
        Err(e) => {
            warn!(
                "Contract returned malformed data URI for {}/{}: {}",
                request.ns, request.name, e
            );
            return (StatusCode::BAD_GATEWAY, "contract returned malformed data URI")
                .into_response();
        }
    };

    // SVG is converted to PNG on the fly so marketplaces don't reject the
    // image as an external link.
    let (mime, payload) = if data.mime == "image/svg+xml" {
        match images::svg_to_png(&data.payload) {
            Ok(png) => ("image/png".to_string(), png),
            Err(e) => {
                warn!(
                    "SVG rasterization for {}/{} failed: {}",
                    request.ns, request.name, e
                );
                return (StatusCode::INTERNAL_SERVER_ERROR, "image conversion failed")
                    .into_response();
            }
        }
    } else {
        (data.mime, data.payload)
    };

    (StatusCode::OK, [(header::CONTENT_TYPE, mime)], payload).into_response()
}
