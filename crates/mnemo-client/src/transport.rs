//! JSON-RPC 2.0 over HTTP: one POST per call, no batching, no retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, trace, warn};

use mnemo_core::{Error, Result};

use crate::casing::camelize_map;
use crate::config::ClientConfig;
use crate::jsonrpc::{RpcRequest, RpcResponse};

/// Low-level JSON-RPC transport.
///
/// Holds the HTTP connection pool, the endpoint, and a request-id counter.
/// Ids start at 1, grow by one per call, and are never reused, including
/// after failed calls. The counter is atomic so a shared transport hands out
/// distinct ids to concurrent callers.
pub struct RpcTransport {
    http: RwLock<Option<Client>>,
    config: ClientConfig,
    endpoint: String,
    next_id: AtomicU64,
}

impl RpcTransport {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        let endpoint = config.rpc_endpoint();

        info!(
            subsystem = "client",
            component = "transport",
            op = "connect",
            endpoint = %endpoint,
            timeout_secs = config.timeout_secs,
            "Initializing memory RPC transport"
        );

        Ok(Self {
            http: RwLock::new(Some(http)),
            config,
            endpoint,
            next_id: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL with trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.config.normalized_base_url()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Id the next call will use.
    pub fn peek_next_id(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst) + 1
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn http_client(&self) -> Result<Client> {
        let guard = self.http.read().unwrap_or_else(|e| e.into_inner());
        guard.clone().ok_or(Error::Closed)
    }

    /// Release the connection pool. Idempotent; later calls fail with
    /// [`Error::Closed`].
    pub fn close(&self) {
        let mut guard = self.http.write().unwrap_or_else(|e| e.into_inner());
        if guard.take().is_some() {
            info!(
                subsystem = "client",
                component = "transport",
                op = "close",
                endpoint = %self.endpoint,
                "Memory RPC transport closed"
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http.read().unwrap_or_else(|e| e.into_inner()).is_none()
    }

    /// Perform one JSON-RPC round trip and return the `result` member
    /// (`Value::Null` when the server sent none).
    ///
    /// Param keys are transcoded to camelCase, except inside `metadata` and
    /// `value` subtrees. When `params` is `None` the envelope carries no
    /// `params` member at all.
    #[instrument(skip(self, method, params), fields(subsystem = "client", component = "transport", op = "call", method = %method))]
    pub async fn call(&self, method: &str, params: Option<Map<String, Value>>) -> Result<Value> {
        if method.is_empty() {
            return Err(Error::Config("RPC method name cannot be empty".to_string()));
        }

        let http = self.http_client()?;
        let id = self.allocate_id();
        let request = RpcRequest::new(id, method, params.map(camelize_map));

        if tracing::enabled!(tracing::Level::TRACE) {
            trace!(
                request_id = id,
                body = %serde_json::to_string(&request).unwrap_or_default(),
                "Sending JSON-RPC request"
            );
        }

        let start = Instant::now();
        let outcome = self.round_trip(&http, &request).await;
        let elapsed = start.elapsed().as_millis() as u64;

        match &outcome {
            Ok(_) => {
                debug!(
                    request_id = id,
                    duration_ms = elapsed,
                    success = true,
                    "JSON-RPC call complete"
                );
            }
            Err(Error::Rpc(e)) => {
                debug!(
                    request_id = id,
                    duration_ms = elapsed,
                    success = false,
                    rpc_code = e.code,
                    rpc_kind = e.kind().name(),
                    "JSON-RPC call returned error"
                );
            }
            Err(e) => {
                warn!(
                    request_id = id,
                    duration_ms = elapsed,
                    success = false,
                    error = %e,
                    "JSON-RPC call failed"
                );
            }
        }

        outcome
    }

    async fn round_trip(&self, http: &Client, request: &RpcRequest<'_>) -> Result<Value> {
        let response = http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.classify_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "HTTP error {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let body = response.bytes().await.map_err(|e| match Error::from(e) {
            Error::Timeout(msg) => Error::Timeout(format!("Request timeout: {}", msg)),
            other => Error::Transport(format!("Failed to read response body: {}", other)),
        })?;

        let parsed = RpcResponse::parse(&body)?;

        if let Some(ref echoed) = parsed.id {
            if echoed.as_u64() != Some(request.id) {
                warn!(
                    request_id = request.id,
                    response_id = %echoed,
                    "JSON-RPC response id does not match request"
                );
            }
        }

        parsed.into_result()
    }

    /// No response was received, so any socket-level failure (refused,
    /// reset, closed mid-request) is a connection failure. Only request
    /// construction problems stay transport errors.
    fn classify_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(format!("Request timeout: {}", e))
        } else if e.is_builder() {
            Error::Transport(format!("Failed to build request: {}", e))
        } else {
            Error::Connection(format!("Failed to connect to {}: {}", self.base_url(), e))
        }
    }
}

impl Drop for RpcTransport {
    fn drop(&mut self) {
        self.close();
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
