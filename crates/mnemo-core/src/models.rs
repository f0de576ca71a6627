//! Decoded result records returned by the memory service.
//!
//! Every record serializes with the wire's camelCase field names and accepts
//! both camelCase and snake_case when decoding. All records are immutable
//! value objects once decoded.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A stored note.
///
/// `namespace` and `score` are produced by the server only; `score` is
/// present on search hits (higher is more relevant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(alias = "project_id")]
    pub project_id: String,
    #[serde(alias = "group_id")]
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub text: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(alias = "created_at")]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Caller-owned payload, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
}

/// Result of `memory.search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Namespace the query executed against.
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Note>,
}

/// Result of `memory.list_recent`; items are newest-first as ordered by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListRecentResult {
    pub namespace: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Note>,
}

/// Result of `memory.add_note`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddNoteResult {
    pub id: String,
    pub namespace: String,
}

/// Plain acknowledgement (`memory.update`, `memory.delete`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

// =============================================================================
// CONFIG TYPES
// =============================================================================

/// Snapshot returned by `memory.get_config`. Never cached client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResult {
    #[serde(alias = "transport_defaults")]
    pub transport_defaults: TransportDefaults,
    pub embedder: EmbedderConfig,
    pub store: StoreConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportDefaults {
    /// "stdio" or "http"
    #[serde(alias = "default_transport")]
    pub default_transport: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedderConfig {
    pub provider: String,
    pub model: String,
    /// Vector dimension; 0 means not yet known.
    pub dim: usize,
    #[serde(default, alias = "base_url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(rename = "type")]
    pub store_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathsConfig {
    #[serde(alias = "config_path")]
    pub config_path: String,
    #[serde(alias = "data_dir")]
    pub data_dir: String,
}

/// Result of `memory.set_config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetConfigResult {
    pub ok: bool,
    /// Namespace derived from the new embedder (`provider:model:dim`).
    #[serde(alias = "effective_namespace")]
    pub effective_namespace: String,
}

// =============================================================================
// GLOBAL KEY-VALUE TYPES
// =============================================================================

/// Result of `memory.upsert_global`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertGlobalResult {
    pub ok: bool,
    pub id: String,
    pub namespace: String,
}

/// Result of `memory.get_global`.
///
/// When `found` is false, `id`, `value` and `updated_at` are all `None`;
/// a response that breaks this fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GlobalValueWire")]
pub struct GlobalValue {
    pub namespace: String,
    pub found: bool,
    pub id: Option<String>,
    pub value: Option<JsonValue>,
    pub updated_at: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlobalValueWire {
    namespace: String,
    found: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    value: Option<JsonValue>,
    #[serde(default, alias = "updated_at")]
    updated_at: Option<String>,
}

impl TryFrom<GlobalValueWire> for GlobalValue {
    type Error = String;

    fn try_from(wire: GlobalValueWire) -> std::result::Result<Self, Self::Error> {
        if !wire.found && (wire.id.is_some() || wire.value.is_some() || wire.updated_at.is_some())
        {
            return Err(format!(
                "global value in namespace {} reported found=false but carried id/value/updatedAt",
                wire.namespace
            ));
        }

        Ok(Self {
            namespace: wire.namespace,
            found: wire.found,
            id: wire.id,
            value: wire.value,
            updated_at: wire.updated_at,
        })
    }
}

impl GlobalValue {
    /// The stored value, only when the key exists.
    pub fn found_value(&self) -> Option<&JsonValue> {
        if self.found {
            self.value.as_ref()
        } else {
            None
        }
    }
}
