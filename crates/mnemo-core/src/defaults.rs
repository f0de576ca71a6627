//! Centralized default constants for the mnemo client.
//!
//! **This module is the single source of truth** for shared default values.
//! Both the transport and the tool adapters reference these constants instead
//! of defining their own magic numbers.

// =============================================================================
// CONNECTION
// =============================================================================

/// Default memory-server base URL.
pub const BASE_URL: &str = "http://localhost:8765";

/// Default request timeout in seconds.
pub const TIMEOUT_SECS: f64 = 30.0;

/// Path of the JSON-RPC endpoint, appended to the base URL.
pub const RPC_PATH: &str = "/rpc";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "MNEMO_BASE_URL";

/// Environment variable overriding the request timeout (seconds, float).
pub const ENV_TIMEOUT_SECS: &str = "MNEMO_TIMEOUT_SECS";

// =============================================================================
// JSON-RPC
// =============================================================================

/// Protocol version carried in every envelope.
pub const JSONRPC_VERSION: &str = "2.0";

/// Code assumed when a server error envelope omits `code`.
pub const FALLBACK_ERROR_CODE: i64 = -32603;

/// Message assumed when a server error envelope omits `message`.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

// =============================================================================
// OPERATIONS
// =============================================================================

/// Default number of search hits requested when the caller does not choose.
pub const SEARCH_TOP_K: u32 = 5;

/// Default page size used by the `memory_list_recent` tool.
pub const TOOL_LIST_LIMIT: u32 = 10;

/// Prefix every global key must carry (enforced server-side).
pub const GLOBAL_KEY_PREFIX: &str = "global.";

/// Wire format for timestamps: `YYYY-MM-DDTHH:MM:SSZ`, always UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
