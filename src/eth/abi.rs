//! Minimal Solidity ABI codec
//!
//! The NftMetadata contract surface only takes `string` arguments and
//! returns single `string` values, so this covers exactly that: 4-byte
//! selectors, dynamic-type head/tail encoding for string arguments, and
//! decoding of a single string return value.

use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Word size of the ABI encoding
const WORD: usize = 32;

/// Errors from decoding ABI data
#[derive(Debug, Error)]
pub enum AbiError {
    #[error("data truncated at offset {0}")]
    Truncated(usize),

    #[error("word at offset {0} does not fit a length")]
    WordOutOfRange(usize),

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("calldata is missing the selector")]
    MissingSelector,
}

/// Compute the 4-byte function selector for a signature like
/// `buildMetadataJson(string,string)`
pub fn selector(signature: &str) -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(signature.as_bytes());
    let digest = hasher.finalize();

    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Encode a call to a function taking only `string` arguments
///
/// Layout: selector, then one offset word per argument, then for each
/// argument its length word and zero-padded UTF-8 payload.
pub fn encode_call(selector: [u8; 4], args: &[&str]) -> Vec<u8> {
    let head_len = WORD * args.len();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for arg in args {
        head.extend_from_slice(&encode_word(head_len + tail.len()));

        let bytes = arg.as_bytes();
        tail.extend_from_slice(&encode_word(bytes.len()));
        tail.extend_from_slice(bytes);

        let rem = bytes.len() % WORD;
        if rem != 0 {
            tail.extend_from_slice(&vec![0u8; WORD - rem]);
        }
    }

    let mut data = Vec::with_capacity(4 + head.len() + tail.len());
    data.extend_from_slice(&selector);
    data.extend_from_slice(&head);
    data.extend_from_slice(&tail);
    data
}

/// Decode return data holding a single `string`
pub fn decode_string(data: &[u8]) -> Result<String, AbiError> {
    let offset = read_word(data, 0)?;
    read_string(data, offset)
}

/// Decode calldata whose arguments are all `string`s
///
/// The argument count is recovered from the offset of the first argument,
/// which directly follows the head in this layout. Used by the test mock
/// chain to pick calls apart.
pub fn decode_string_args(calldata: &[u8]) -> Result<Vec<String>, AbiError> {
    if calldata.len() < 4 {
        return Err(AbiError::MissingSelector);
    }
    let data = &calldata[4..];

    if data.is_empty() {
        return Ok(Vec::new());
    }

    let first_offset = read_word(data, 0)?;
    if first_offset == 0 || first_offset % WORD != 0 {
        return Err(AbiError::WordOutOfRange(0));
    }
    let nargs = first_offset / WORD;

    let mut args = Vec::with_capacity(nargs);
    for i in 0..nargs {
        let offset = read_word(data, i * WORD)?;
        args.push(read_string(data, offset)?);
    }
    Ok(args)
}

/// Encode a usize as a 32-byte big-endian word
fn encode_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Read a 32-byte word at `pos` as a usize
fn read_word(data: &[u8], pos: usize) -> Result<usize, AbiError> {
    let end = pos.checked_add(WORD).ok_or(AbiError::WordOutOfRange(pos))?;
    if data.len() < end {
        return Err(AbiError::Truncated(pos));
    }
    let word = &data[pos..end];

    // Anything beyond u64 range cannot index real payloads.
    if word[..WORD - 8].iter().any(|&b| b != 0) {
        return Err(AbiError::WordOutOfRange(pos));
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[WORD - 8..]);
    Ok(u64::from_be_bytes(buf) as usize)
}

/// Read a length-prefixed string at `offset`
fn read_string(data: &[u8], offset: usize) -> Result<String, AbiError> {
    let len = read_word(data, offset)?;

    let start = offset + WORD;
    let end = start.checked_add(len).ok_or(AbiError::WordOutOfRange(offset))?;
    if data.len() < end {
        return Err(AbiError::Truncated(start));
    }

    String::from_utf8(data[start..end].to_vec()).map_err(|_| AbiError::InvalidUtf8)
}
