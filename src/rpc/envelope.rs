//! JSON-RPC 2.0 envelopes
//!
//! Transient value objects for one call/response pair, plus decoding of the
//! `0x`-prefixed hexadecimal quantities Ethereum nodes return.

use crate::errors::{RpcError, RpcResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Protocol version tag sent with every request
pub const JSONRPC_VERSION: &str = "2.0";

/// Method returning the node's latest block number as a hex quantity
pub const METHOD_BLOCK_NUMBER: &str = "eth_blockNumber";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }

    pub fn block_number(id: u64) -> Self {
        Self::new(id, METHOD_BLOCK_NUMBER, Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

impl RpcResponse {
    /// Extract the `result` field as a string, surfacing node errors first
    pub fn into_string_result(self, method: &str) -> RpcResult<String> {
        if let Some(err) = self.error {
            return Err(RpcError::NodeError {
                code: err.code,
                message: err.message,
            });
        }

        match self.result {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(RpcError::InvalidResponse(format!(
                "{} returned non-string result: {}",
                method, other
            ))),
            None => Err(RpcError::InvalidResponse(format!(
                "{} response carried neither result nor error",
                method
            ))),
        }
    }
}

/// Decode a `0x`-prefixed hexadecimal quantity into a `u64`.
///
/// The digits are read as an arbitrary-width big-endian number and only its
/// low 64 bits are kept. Anything that is not a prefix followed by at least
/// one hex digit is rejected.
pub fn parse_hex_quantity(value: &str) -> RpcResult<u64> {
    let invalid = || RpcError::InvalidHexQuantity {
        value: value.to_string(),
    };

    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .ok_or_else(invalid)?;

    if digits.is_empty() {
        return Err(invalid());
    }

    // hex::decode wants whole bytes
    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(&padded).map_err(|_| invalid())?;

    let low = &bytes[bytes.len().saturating_sub(8)..];
    let mut word = [0u8; 8];
    word[8 - low.len()..].copy_from_slice(low);
    Ok(u64::from_be_bytes(word))
}
