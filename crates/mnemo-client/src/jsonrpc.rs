//! JSON-RPC 2.0 envelope types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mnemo_core::{defaults, Error, Result, RpcError};

/// Outbound request envelope.
///
/// `params` is omitted from the body entirely when absent, never sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: Option<Map<String, Value>>) -> Self {
        Self {
            jsonrpc: defaults::JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

/// Inbound response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// Parse a raw HTTP body.
    ///
    /// Anything that is not a JSON object is a transport failure, as is an
    /// `error` member that cannot be read as an error object.
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| Error::Transport(format!("Invalid JSON response: {}", e)))?;

        if !value.is_object() {
            return Err(Error::Transport(format!(
                "Invalid JSON-RPC response: expected an object, got {}",
                json_kind(&value)
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| Error::Transport(format!("Invalid JSON-RPC response: {}", e)))
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The `result` member (or `null` when absent), or the server's error.
    pub fn into_result(self) -> Result<Value> {
        match self.error {
            Some(err) => Err(Error::Rpc(err)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_without_params_omits_member() {
        let req = RpcRequest::new(1, "memory.get_config", None);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"jsonrpc": "2.0", "id": 1, "method": "memory.get_config"}));
        assert!(body.get("params").is_none());
    }

    #[test]
    fn test_request_with_params() {
        let mut params = Map::new();
        params.insert("id".to_string(), json!("n1"));
        let req = RpcRequest::new(7, "memory.get", Some(params));
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["id"], 7);
        assert_eq!(body["params"], json!({"id": "n1"}));
    }

    #[test]
    fn test_parse_success() {
        let resp = RpcResponse::parse(br#"{"jsonrpc":"2.0","id":1,"result":{"ok":true}}"#).unwrap();
        assert!(!resp.is_error());
        assert_eq!(resp.into_result().unwrap(), json!({"ok": true}));
    }

    #[test]
    fn test_parse_missing_result_is_null() {
        let resp = RpcResponse::parse(br#"{"jsonrpc":"2.0","id":1}"#).unwrap();
        assert_eq!(resp.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_parse_error_envelope() {
        let resp = RpcResponse::parse(
            br#"{"jsonrpc":"2.0","id":1,"error":{"code":-32001,"message":"note not found"}}"#,
        )
        .unwrap();
        assert!(resp.is_error());
        match resp.into_result() {
            Err(Error::Rpc(e)) => {
                assert!(e.is_not_found());
                assert_eq!(e.message, "note not found");
            }
            other => panic!("Expected Rpc error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_envelope_defaults() {
        let resp = RpcResponse::parse(br#"{"jsonrpc":"2.0","id":1,"error":{}}"#).unwrap();
        let err = resp.into_result().unwrap_err();
        assert_eq!(err.rpc_code(), Some(-32603));
        assert!(err.to_string().contains("Unknown error"));
    }

    #[test]
    fn test_parse_invalid_json_is_transport_error() {
        let err = RpcResponse::parse(b"<html>bad gateway</html>").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("Invalid JSON response"));
    }

    #[test]
    fn test_parse_non_object_is_transport_error() {
        let err = RpcResponse::parse(b"[1,2,3]").unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_parse_malformed_error_member_is_transport_error() {
        let err = RpcResponse::parse(br#"{"error":"boom"}"#).unwrap_err();
        assert!(err.is_transport());
    }
}
