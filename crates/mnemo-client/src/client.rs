//! Typed memory-service client over the JSON-RPC transport.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use mnemo_core::{
    Ack, AddNoteResult, ConfigResult, Error, GlobalValue, ListRecentResult, Note, Result,
    SearchResult, SetConfigResult, UpsertGlobalResult,
};

use crate::api::MemoryApi;
use crate::config::ClientConfig;
use crate::requests::{
    AddNoteRequest, EmbedderPatch, ListRecentRequest, NotePatch, SearchRequest,
    UpsertGlobalRequest,
};
use crate::transport::RpcTransport;

/// JSON-RPC method names served by the memory server.
pub mod methods {
    pub const ADD_NOTE: &str = "memory.add_note";
    pub const SEARCH: &str = "memory.search";
    pub const GET: &str = "memory.get";
    pub const UPDATE: &str = "memory.update";
    pub const DELETE: &str = "memory.delete";
    pub const LIST_RECENT: &str = "memory.list_recent";
    pub const GET_CONFIG: &str = "memory.get_config";
    pub const SET_CONFIG: &str = "memory.set_config";
    pub const UPSERT_GLOBAL: &str = "memory.upsert_global";
    pub const GET_GLOBAL: &str = "memory.get_global";
}

/// Memory-service client.
///
/// One instance owns one HTTP connection pool and one request-id counter.
/// Share it by reference or `Arc`; release it with [`close`](Self::close)
/// or by dropping it.
pub struct MemoryClient {
    transport: RpcTransport,
}

impl MemoryClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: RpcTransport::new(config)?,
        })
    }

    /// Connect to `http://localhost:8765` with a 30 second timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn connect(base_url: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    pub fn transport(&self) -> &RpcTransport {
        &self.transport
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    pub fn timeout_secs(&self) -> f64 {
        self.transport.config().timeout_secs
    }

    /// Raw JSON-RPC call, for methods without a typed wrapper.
    pub async fn call(&self, method: &str, params: Option<Map<String, Value>>) -> Result<Value> {
        self.transport.call(method, params).await
    }

    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    async fn invoke<P, R>(&self, method: &str, params: &P) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let params = to_params(params)?;
        let result = self.transport.call(method, Some(params)).await?;
        decode(method, result)
    }
}

#[derive(Serialize)]
struct NoteIdParams<'a> {
    id: &'a str,
}

#[derive(Serialize)]
struct UpdateParams<'a> {
    id: &'a str,
    patch: &'a NotePatch,
}

#[derive(Serialize)]
struct SetConfigParams<'a> {
    embedder: &'a EmbedderPatch,
}

#[derive(Serialize)]
struct GlobalKeyParams<'a> {
    project_id: &'a str,
    key: &'a str,
}

fn to_params<P: Serialize + ?Sized>(params: &P) -> Result<Map<String, Value>> {
    match serde_json::to_value(params)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::Config(format!("RPC params must be an object, got: {}", other))),
    }
}

fn decode<R: DeserializeOwned>(method: &str, result: Value) -> Result<R> {
    if result.is_null() {
        return Err(Error::Decode(format!("{} returned no result", method)));
    }
    serde_json::from_value(result)
        .map_err(|e| Error::Decode(format!("Failed to decode {} result: {}", method, e)))
}

#[async_trait]
impl MemoryApi for MemoryClient {
    async fn add_note(&self, request: AddNoteRequest) -> Result<AddNoteResult> {
        self.invoke(methods::ADD_NOTE, &request).await
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResult> {
        let result: SearchResult = self.invoke(methods::SEARCH, &request).await?;
        debug!(
            subsystem = "client",
            op = "search",
            namespace = %result.namespace,
            result_count = result.results.len(),
            "Search complete"
        );
        Ok(result)
    }

    async fn get(&self, note_id: &str) -> Result<Note> {
        self.invoke(methods::GET, &NoteIdParams { id: note_id }).await
    }

    async fn update(&self, note_id: &str, patch: NotePatch) -> Result<Ack> {
        let params = UpdateParams {
            id: note_id,
            patch: &patch,
        };
        self.invoke(methods::UPDATE, &params).await
    }

    async fn delete(&self, note_id: &str) -> Result<Ack> {
        self.invoke(methods::DELETE, &NoteIdParams { id: note_id }).await
    }

    async fn list_recent(&self, request: ListRecentRequest) -> Result<ListRecentResult> {
        let result: ListRecentResult = self.invoke(methods::LIST_RECENT, &request).await?;
        debug!(
            subsystem = "client",
            op = "list_recent",
            namespace = %result.namespace,
            result_count = result.items.len(),
            "List recent complete"
        );
        Ok(result)
    }

    async fn get_config(&self) -> Result<ConfigResult> {
        let result = self.transport.call(methods::GET_CONFIG, None).await?;
        decode(methods::GET_CONFIG, result)
    }

    async fn set_config(&self, embedder: EmbedderPatch) -> Result<SetConfigResult> {
        let params = SetConfigParams {
            embedder: &embedder,
        };
        self.invoke(methods::SET_CONFIG, &params).await
    }

    async fn upsert_global(&self, request: UpsertGlobalRequest) -> Result<UpsertGlobalResult> {
        self.invoke(methods::UPSERT_GLOBAL, &request).await
    }

    async fn get_global(&self, project_id: &str, key: &str) -> Result<GlobalValue> {
        let params = GlobalKeyParams { project_id, key };
        self.invoke(methods::GET_GLOBAL, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_default_settings() {
        let client = MemoryClient::with_defaults().unwrap();
        assert_eq!(client.base_url(), "http://localhost:8765");
        assert_eq!(client.timeout_secs(), 30.0);
        client.close();
    }

    #[test]
    fn test_client_custom_settings() {
        let client =
            MemoryClient::new(ClientConfig::new("http://localhost:9000").with_timeout_secs(60.0))
                .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000");
        assert_eq!(client.timeout_secs(), 60.0);
    }

    #[test]
    fn test_client_trailing_slash_removed() {
        let client = MemoryClient::connect("http://localhost:8765/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8765");
    }

    #[test]
    fn test_to_params_rejects_non_objects() {
        assert!(matches!(to_params(&"scalar"), Err(Error::Config(_))));
        assert!(to_params(&json!({"id": "n1"})).is_ok());
    }

    #[test]
    fn test_decode_null_result() {
        let err = decode::<Ack>(methods::UPDATE, Value::Null).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(err.to_string().contains("memory.update"));
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let err = decode::<AddNoteResult>(methods::ADD_NOTE, json!({"id": 5})).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_call_after_close_fails() {
        let client = MemoryClient::with_defaults().unwrap();
        client.close();
        assert!(client.is_closed());
        let err = client.get_config().await.unwrap_err();
        assert!(matches!(err, Error::Closed));
    }
}
