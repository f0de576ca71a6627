//! Agent-facing tool adapters over [`MemoryApi`].
//!
//! Each tool takes snake_case JSON arguments, validates them against a
//! `schemars`-derived schema, calls one memory operation, and returns the
//! result as JSON text. The toolkit holds an explicitly injected client;
//! there is no global instance.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mnemo_client::{MemoryClient, MemoryToolkit};
//!
//! # async fn demo() -> mnemo_client::Result<()> {
//! let client = Arc::new(MemoryClient::connect("http://localhost:8765")?);
//! let toolkit = MemoryToolkit::builder().client(client).build()?;
//!
//! for tool in toolkit.definitions()? {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//!
//! let hits = toolkit
//!     .call("memory_search", serde_json::json!({"project_id": "/p", "query": "auth"}))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, instrument};

use mnemo_core::{defaults, Error, Result};

use crate::api::MemoryApi;
use crate::requests::{AddNoteRequest, ListRecentRequest, SearchRequest, UpsertGlobalRequest};

// =============================================================================
// ARGUMENT RECORDS
// =============================================================================

fn default_top_k() -> u32 {
    defaults::SEARCH_TOP_K
}

fn default_list_limit() -> u32 {
    defaults::TOOL_LIST_LIMIT
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct SearchArgs {
    /// Project ID (path)
    pub project_id: String,
    /// Search query
    pub query: String,
    /// Group ID filter; omit to search all groups
    #[serde(default)]
    pub group_id: Option<String>,
    /// Number of results
    #[serde(default = "default_top_k")]
    pub top_k: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddNoteArgs {
    /// Project ID (path)
    pub project_id: String,
    /// Group ID ("global", "feature-xxx", "task-xxx", ...)
    pub group_id: String,
    /// Note content
    pub text: String,
    /// Note title
    #[serde(default)]
    pub title: Option<String>,
    /// Tag list
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetNoteArgs {
    /// Note ID
    pub note_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListRecentArgs {
    /// Project ID (path)
    pub project_id: String,
    /// Group ID filter
    #[serde(default)]
    pub group_id: Option<String>,
    /// Number of results
    #[serde(default = "default_list_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpsertGlobalArgs {
    /// Project ID (path)
    pub project_id: String,
    /// Key; must start with "global."
    pub key: String,
    /// Value (any JSON value)
    pub value: JsonValue,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GetGlobalArgs {
    /// Project ID (path)
    pub project_id: String,
    /// Key
    pub key: String,
}

// =============================================================================
// TOOL CATALOG
// =============================================================================

/// Description of one tool, as handed to an agent framework.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: String,
    pub input_schema: JsonValue,
}

/// The tools exposed by [`MemoryToolkit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryTool {
    Search,
    AddNote,
    GetNote,
    ListRecent,
    UpsertGlobal,
    GetGlobal,
}

impl MemoryTool {
    pub const ALL: [MemoryTool; 6] = [
        Self::Search,
        Self::AddNote,
        Self::GetNote,
        Self::ListRecent,
        Self::UpsertGlobal,
        Self::GetGlobal,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Search => "memory_search",
            Self::AddNote => "memory_add_note",
            Self::GetNote => "memory_get_note",
            Self::ListRecent => "memory_list_recent",
            Self::UpsertGlobal => "memory_upsert_global",
            Self::GetGlobal => "memory_get_global",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Self::Search => {
                "Search project memory by semantic similarity. Returns a JSON array of notes."
                    .to_string()
            }
            Self::AddNote => {
                "Add a note to project memory. Returns JSON with id and namespace.".to_string()
            }
            Self::GetNote => "Get a note by ID. Returns the note as JSON.".to_string(),
            Self::ListRecent => {
                "List recent notes from project memory, newest first. Returns a JSON array of notes."
                    .to_string()
            }
            Self::UpsertGlobal => format!(
                "Save a global setting. The key must start with \"{}\". Returns JSON with ok, id and namespace.",
                defaults::GLOBAL_KEY_PREFIX
            ),
            Self::GetGlobal => {
                "Get a global setting. Returns JSON with the found status and value.".to_string()
            }
        }
    }

    pub fn input_schema(&self) -> Result<JsonValue> {
        let schema = match self {
            Self::Search => schema_for!(SearchArgs),
            Self::AddNote => schema_for!(AddNoteArgs),
            Self::GetNote => schema_for!(GetNoteArgs),
            Self::ListRecent => schema_for!(ListRecentArgs),
            Self::UpsertGlobal => schema_for!(UpsertGlobalArgs),
            Self::GetGlobal => schema_for!(GetGlobalArgs),
        };
        serde_json::to_value(schema).map_err(|e| {
            Error::Decode(format!("Failed to render input schema for {}: {}", self, e))
        })
    }

    pub fn definition(&self) -> Result<ToolDefinition> {
        Ok(ToolDefinition {
            name: self.name(),
            description: self.description(),
            input_schema: self.input_schema()?,
        })
    }
}

impl FromStr for MemoryTool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.name() == s)
            .ok_or_else(|| Error::Config(format!("Unknown tool: {}", s)))
    }
}

impl fmt::Display for MemoryTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TOOLKIT
// =============================================================================

/// Dispatches tool calls to an injected [`MemoryApi`].
#[derive(Clone)]
pub struct MemoryToolkit {
    api: Arc<dyn MemoryApi>,
}

impl MemoryToolkit {
    pub fn new<A: MemoryApi + 'static>(api: Arc<A>) -> Self {
        let api: Arc<dyn MemoryApi> = api;
        Self { api }
    }

    pub fn builder() -> MemoryToolkitBuilder {
        MemoryToolkitBuilder::default()
    }

    pub fn api(&self) -> &dyn MemoryApi {
        self.api.as_ref()
    }

    pub fn definitions(&self) -> Result<Vec<ToolDefinition>> {
        MemoryTool::ALL.iter().map(MemoryTool::definition).collect()
    }

    /// Run one tool by name and return its JSON text output.
    ///
    /// Unknown names are [`Error::Config`]; arguments that do not match the
    /// tool's schema are [`Error::Decode`]. Memory-call failures pass through
    /// unchanged.
    #[instrument(skip(self, name, arguments), fields(subsystem = "client", component = "tools", tool = %name))]
    pub async fn call(&self, name: &str, arguments: JsonValue) -> Result<String> {
        let tool: MemoryTool = name.parse()?;

        let output = match tool {
            MemoryTool::Search => {
                let args: SearchArgs = parse_args(tool, arguments)?;
                let mut request = SearchRequest::new(args.project_id, args.query).top_k(args.top_k);
                if let Some(group_id) = args.group_id {
                    request = request.group_id(group_id);
                }
                let result = self.api.search(request).await?;
                serde_json::to_string(&result.results)?
            }
            MemoryTool::AddNote => {
                let args: AddNoteArgs = parse_args(tool, arguments)?;
                let mut request = AddNoteRequest::new(args.project_id, args.group_id, args.text);
                request.title = args.title;
                request.tags = args.tags;
                let result = self.api.add_note(request).await?;
                serde_json::to_string(&result)?
            }
            MemoryTool::GetNote => {
                let args: GetNoteArgs = parse_args(tool, arguments)?;
                let note = self.api.get(&args.note_id).await?;
                serde_json::to_string(&note)?
            }
            MemoryTool::ListRecent => {
                let args: ListRecentArgs = parse_args(tool, arguments)?;
                let mut request = ListRecentRequest::new(args.project_id).limit(args.limit);
                request.group_id = args.group_id;
                let result = self.api.list_recent(request).await?;
                serde_json::to_string(&result.items)?
            }
            MemoryTool::UpsertGlobal => {
                let args: UpsertGlobalArgs = parse_args(tool, arguments)?;
                let request = UpsertGlobalRequest::new(args.project_id, args.key, args.value);
                let result = self.api.upsert_global(request).await?;
                serde_json::to_string(&result)?
            }
            MemoryTool::GetGlobal => {
                let args: GetGlobalArgs = parse_args(tool, arguments)?;
                let result = self.api.get_global(&args.project_id, &args.key).await?;
                serde_json::to_string(&result)?
            }
        };

        debug!(output_len = output.len(), "Tool call complete");
        Ok(output)
    }
}

fn parse_args<T: DeserializeOwned>(tool: MemoryTool, arguments: JsonValue) -> Result<T> {
    serde_json::from_value(arguments)
        .map_err(|e| Error::Decode(format!("Invalid arguments for {}: {}", tool, e)))
}

/// Builder that refuses to produce a toolkit without a client.
#[derive(Default)]
pub struct MemoryToolkitBuilder {
    api: Option<Arc<dyn MemoryApi>>,
}

impl MemoryToolkitBuilder {
    pub fn client<A: MemoryApi + 'static>(mut self, api: Arc<A>) -> Self {
        let api: Arc<dyn MemoryApi> = api;
        self.api = Some(api);
        self
    }

    pub fn build(self) -> Result<MemoryToolkit> {
        let api = self.api.ok_or_else(|| {
            Error::Config("MemoryToolkit requires a client; call .client(..) before .build()".to_string())
        })?;
        Ok(MemoryToolkit { api })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in MemoryTool::ALL {
            assert_eq!(tool.name().parse::<MemoryTool>().unwrap(), tool);
        }
    }

    #[test]
    fn test_unknown_tool_name() {
        let err = "memory_delete_everything".parse::<MemoryTool>().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_search_schema_lists_required_fields() {
        let schema = MemoryTool::Search.input_schema().unwrap();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"project_id"));
        assert!(required.contains(&"query"));
        assert!(!required.contains(&"top_k"));
        assert!(schema["properties"]["top_k"].is_object());
    }

    #[test]
    fn test_every_input_schema_is_an_object() {
        for tool in MemoryTool::ALL {
            let schema = tool.input_schema().unwrap();
            assert!(schema.is_object(), "{} schema is {}", tool, schema);
            assert_eq!(schema["type"], "object", "{} schema has no object type", tool);
        }
    }

    #[test]
    fn test_upsert_description_mentions_prefix() {
        assert!(MemoryTool::UpsertGlobal.description().contains("global."));
    }

    #[test]
    fn test_definition_serializes_input_schema_camel_case() {
        let def = serde_json::to_value(MemoryTool::GetNote.definition().unwrap()).unwrap();
        assert_eq!(def["name"], "memory_get_note");
        assert!(def["inputSchema"].is_object());
    }

    #[test]
    fn test_builder_without_client_fails() {
        let result = MemoryToolkit::builder().build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_search_args_defaults() {
        let args: SearchArgs =
            serde_json::from_value(serde_json::json!({"project_id": "/p", "query": "q"})).unwrap();
        assert_eq!(args.top_k, 5);
        assert!(args.group_id.is_none());
    }

    #[test]
    fn test_list_recent_args_default_limit() {
        let args: ListRecentArgs =
            serde_json::from_value(serde_json::json!({"project_id": "/p"})).unwrap();
        assert_eq!(args.limit, 10);
    }

    #[test]
    fn test_upsert_args_require_value() {
        let result = serde_json::from_value::<UpsertGlobalArgs>(
            serde_json::json!({"project_id": "/p", "key": "global.k"}),
        );
        assert!(result.is_err());
    }
}
