//! # mnemo-client
//!
//! Async client for the mnemo memory service, a JSON-RPC 2.0 server that
//! stores project notes and global settings and searches them by vector
//! similarity.
//!
//! Layers:
//! - [`RpcTransport`]: envelope construction, request ids, snake_case to
//!   camelCase param transcoding, and error classification
//! - [`MemoryClient`]: one typed method per memory operation, via the
//!   [`MemoryApi`] trait
//! - [`MemoryToolkit`]: tool adapters for agent frameworks
//!
//! ```rust,no_run
//! use mnemo_client::{AddNoteRequest, MemoryApi, MemoryClient, SearchRequest};
//!
//! # async fn demo() -> mnemo_client::Result<()> {
//! let client = MemoryClient::connect("http://localhost:8765")?;
//!
//! let added = client
//!     .add_note(AddNoteRequest::new("/path/to/project", "global", "Always use pytest"))
//!     .await?;
//! println!("stored {} in {}", added.id, added.namespace);
//!
//! let hits = client
//!     .search(SearchRequest::new("/path/to/project", "test framework"))
//!     .await?;
//! for note in hits.results {
//!     println!("{:?} {}", note.score, note.text);
//! }
//!
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod casing;
pub mod client;
pub mod config;
pub mod jsonrpc;
pub mod requests;
pub mod timestamp;
pub mod tools;
pub mod transport;

pub use api::MemoryApi;
pub use client::{methods, MemoryClient};
pub use config::ClientConfig;
pub use requests::{
    AddNoteRequest, EmbedderPatch, ListRecentRequest, NotePatch, SearchRequest,
    UpsertGlobalRequest,
};
pub use timestamp::Timestamp;
pub use tools::{MemoryTool, MemoryToolkit, MemoryToolkitBuilder, ToolDefinition};
pub use transport::RpcTransport;

// Re-export core types so callers need a single dependency
pub use mnemo_core::*;
