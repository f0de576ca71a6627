//! The memory-service operation set.

use async_trait::async_trait;

use mnemo_core::{
    Ack, AddNoteResult, ConfigResult, GlobalValue, ListRecentResult, Note, Result, SearchResult,
    SetConfigResult, UpsertGlobalResult,
};

use crate::requests::{
    AddNoteRequest, EmbedderPatch, ListRecentRequest, NotePatch, SearchRequest,
    UpsertGlobalRequest,
};

/// Typed memory operations.
///
/// [`MemoryClient`](crate::MemoryClient) implements this over JSON-RPC. Tool
/// adapters depend on the trait so they can be driven by any implementation.
/// Every call is dispatched independently; nothing is retried or cached.
#[async_trait]
pub trait MemoryApi: Send + Sync {
    /// Store a note and return its server-assigned id and namespace.
    async fn add_note(&self, request: AddNoteRequest) -> Result<AddNoteResult>;

    /// Vector-similarity search within a project.
    async fn search(&self, request: SearchRequest) -> Result<SearchResult>;

    /// Fetch one note. A missing note is an RPC not-found error.
    async fn get(&self, note_id: &str) -> Result<Note>;

    /// Apply a partial update to a note.
    async fn update(&self, note_id: &str, patch: NotePatch) -> Result<Ack>;

    /// Delete a note.
    async fn delete(&self, note_id: &str) -> Result<Ack>;

    /// Most recent notes first.
    async fn list_recent(&self, request: ListRecentRequest) -> Result<ListRecentResult>;

    async fn get_config(&self) -> Result<ConfigResult>;

    async fn set_config(&self, embedder: EmbedderPatch) -> Result<SetConfigResult>;

    async fn upsert_global(&self, request: UpsertGlobalRequest) -> Result<UpsertGlobalResult>;

    async fn get_global(&self, project_id: &str, key: &str) -> Result<GlobalValue>;
}
