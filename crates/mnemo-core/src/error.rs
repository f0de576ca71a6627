//! Error types for the mnemo client.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::defaults;

/// Result type alias using mnemo's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Every way a memory-service call can fail.
///
/// The first four variants are the transport taxonomy and never overlap:
/// a failure is classified exactly once, at the point it is observed.
#[derive(Error, Debug)]
pub enum Error {
    /// Socket, DNS or connect failure before any response arrived
    #[error("Connection error: {0}")]
    Connection(String),

    /// Deadline exceeded while waiting for a response
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Non-2xx HTTP status, or a body that could not be read as JSON
    #[error("Transport error: {0}")]
    Transport(String),

    /// Well-formed JSON-RPC error envelope returned by the server
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Result did not match the expected record shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid client configuration or missing injected client
    #[error("Configuration error: {0}")]
    Config(String),

    /// Call attempted after the client was closed
    #[error("Client is closed")]
    Closed,
}

impl Error {
    /// Numeric JSON-RPC code when this is an RPC failure.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Error::Rpc(e) => Some(e.code),
            _ => None,
        }
    }

    /// Borrow the RPC error payload, if any.
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Error::Rpc(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        // A connect timeout reports both flags; the deadline wins.
        if e.is_timeout() {
            Error::Timeout(e.to_string())
        } else if e.is_connect() {
            Error::Connection(e.to_string())
        } else {
            Error::Transport(e.to_string())
        }
    }
}

/// Known JSON-RPC error codes, standard and server-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcErrorCode {
    /// -32700: body was not valid JSON
    ParseError,
    /// -32600: envelope is not a valid request
    InvalidRequest,
    /// -32601: method does not exist
    MethodNotFound,
    /// -32602: params missing or malformed
    InvalidParams,
    /// -32603: internal/generic server failure
    Internal,
    /// -32001: requested resource does not exist
    NotFound,
    /// -32002: embedder API key is not configured
    ApiKeyMissing,
    /// -32003: global key does not start with `global.`
    InvalidKeyPrefix,
    /// Any code outside the table
    Other(i64),
}

impl RpcErrorCode {
    pub fn from_code(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::Internal,
            -32001 => Self::NotFound,
            -32002 => Self::ApiKeyMissing,
            -32003 => Self::InvalidKeyPrefix,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::Internal => -32603,
            Self::NotFound => -32001,
            Self::ApiKeyMissing => -32002,
            Self::InvalidKeyPrefix => -32003,
            Self::Other(code) => *code,
        }
    }

    /// Stable snake_case name, suitable for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ParseError => "parse_error",
            Self::InvalidRequest => "invalid_request",
            Self::MethodNotFound => "method_not_found",
            Self::InvalidParams => "invalid_params",
            Self::Internal => "internal",
            Self::NotFound => "not_found",
            Self::ApiKeyMissing => "api_key_missing",
            Self::InvalidKeyPrefix => "invalid_key_prefix",
            Self::Other(_) => "other",
        }
    }
}

fn fallback_code() -> i64 {
    defaults::FALLBACK_ERROR_CODE
}

fn fallback_message() -> String {
    defaults::FALLBACK_ERROR_MESSAGE.to_string()
}

// An explicit null reads the same as an absent member.
fn code_or_fallback<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<i64, D::Error> {
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_else(fallback_code))
}

fn message_or_fallback<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(fallback_message))
}

/// Error member of a JSON-RPC response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("[{code}] {message}")]
pub struct RpcError {
    #[serde(default = "fallback_code", deserialize_with = "code_or_fallback")]
    pub code: i64,
    #[serde(default = "fallback_message", deserialize_with = "message_or_fallback")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonValue>,
}

impl RpcError {
    pub fn kind(&self) -> RpcErrorCode {
        RpcErrorCode::from_code(self.code)
    }

    pub fn is_method_not_found(&self) -> bool {
        self.kind() == RpcErrorCode::MethodNotFound
    }

    pub fn is_invalid_params(&self) -> bool {
        self.kind() == RpcErrorCode::InvalidParams
    }

    pub fn is_internal(&self) -> bool {
        self.kind() == RpcErrorCode::Internal
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == RpcErrorCode::NotFound
    }

    pub fn is_api_key_missing(&self) -> bool {
        self.kind() == RpcErrorCode::ApiKeyMissing
    }

    pub fn is_invalid_key_prefix(&self) -> bool {
        self.kind() == RpcErrorCode::InvalidKeyPrefix
    }
}
