//! Tool adapter tests driven by an in-memory `MemoryApi` implementation.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mnemo_client::{
    Ack, AddNoteRequest, AddNoteResult, ConfigResult, EmbedderPatch, Error, GlobalValue,
    ListRecentRequest, ListRecentResult, MemoryApi, MemoryTool, MemoryToolkit, Note, NotePatch,
    Result, RpcError, SearchRequest, SearchResult, SetConfigResult, UpsertGlobalRequest,
    UpsertGlobalResult,
};
use serde_json::{json, Value};

const NAMESPACE: &str = "openai:text-embedding-3-small:1536";

#[derive(Default)]
struct FakeMemory {
    searches: Mutex<Vec<SearchRequest>>,
    added: Mutex<Vec<AddNoteRequest>>,
    listed: Mutex<Vec<ListRecentRequest>>,
    upserts: Mutex<Vec<UpsertGlobalRequest>>,
}

fn note(id: &str, text: &str) -> Note {
    serde_json::from_value(json!({
        "id": id,
        "projectId": "/p",
        "groupId": "global",
        "text": text,
        "createdAt": "2024-01-15T10:30:00Z"
    }))
    .unwrap()
}

#[async_trait]
impl MemoryApi for FakeMemory {
    async fn add_note(&self, request: AddNoteRequest) -> Result<AddNoteResult> {
        self.added.lock().unwrap().push(request);
        Ok(AddNoteResult {
            id: "note-1".to_string(),
            namespace: NAMESPACE.to_string(),
        })
    }

    async fn search(&self, request: SearchRequest) -> Result<SearchResult> {
        self.searches.lock().unwrap().push(request);
        Ok(SearchResult {
            namespace: NAMESPACE.to_string(),
            results: vec![note("note-1", "Use pytest")],
        })
    }

    async fn get(&self, note_id: &str) -> Result<Note> {
        if note_id == "missing" {
            return Err(Error::Rpc(RpcError {
                code: -32001,
                message: "note not found".to_string(),
                data: None,
            }));
        }
        Ok(note(note_id, "body"))
    }

    async fn update(&self, _note_id: &str, _patch: NotePatch) -> Result<Ack> {
        Ok(Ack { ok: true })
    }

    async fn delete(&self, _note_id: &str) -> Result<Ack> {
        Ok(Ack { ok: true })
    }

    async fn list_recent(&self, request: ListRecentRequest) -> Result<ListRecentResult> {
        self.listed.lock().unwrap().push(request);
        Ok(ListRecentResult {
            namespace: NAMESPACE.to_string(),
            items: vec![note("n2", "newer"), note("n1", "older")],
        })
    }

    async fn get_config(&self) -> Result<ConfigResult> {
        Err(Error::Transport("not used by tools".to_string()))
    }

    async fn set_config(&self, _embedder: EmbedderPatch) -> Result<SetConfigResult> {
        Err(Error::Transport("not used by tools".to_string()))
    }

    async fn upsert_global(&self, request: UpsertGlobalRequest) -> Result<UpsertGlobalResult> {
        self.upserts.lock().unwrap().push(request);
        Ok(UpsertGlobalResult {
            ok: true,
            id: "global-1".to_string(),
            namespace: NAMESPACE.to_string(),
        })
    }

    async fn get_global(&self, _project_id: &str, key: &str) -> Result<GlobalValue> {
        let found = key == "global.style";
        Ok(GlobalValue {
            namespace: NAMESPACE.to_string(),
            found,
            id: found.then(|| "global-1".to_string()),
            value: found.then(|| json!({"use_tabs": false})),
            updated_at: found.then(|| "2024-01-15T10:30:00Z".to_string()),
        })
    }
}

fn toolkit() -> (Arc<FakeMemory>, MemoryToolkit) {
    let fake = Arc::new(FakeMemory::default());
    let toolkit = MemoryToolkit::builder().client(fake.clone()).build().unwrap();
    (fake, toolkit)
}

#[test]
fn test_definitions_cover_every_tool() {
    let (_, toolkit) = toolkit();
    let names: Vec<&str> = toolkit.definitions().unwrap().iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![
            "memory_search",
            "memory_add_note",
            "memory_get_note",
            "memory_list_recent",
            "memory_upsert_global",
            "memory_get_global",
        ]
    );
    assert_eq!(MemoryTool::ALL.len(), names.len());
}

#[tokio::test]
async fn test_search_tool_defaults_top_k() {
    let (fake, toolkit) = toolkit();
    let output = toolkit
        .call("memory_search", json!({"project_id": "/p", "query": "testing"}))
        .await
        .unwrap();

    let notes: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(notes.as_array().unwrap().len(), 1);
    assert_eq!(notes[0]["id"], "note-1");
    assert_eq!(notes[0]["projectId"], "/p");

    let searches = fake.searches.lock().unwrap();
    assert_eq!(searches[0].top_k, 5);
    assert_eq!(searches[0].query, "testing");
    assert!(searches[0].group_id.is_none());
}

#[tokio::test]
async fn test_search_tool_forwards_group_and_top_k() {
    let (fake, toolkit) = toolkit();
    toolkit
        .call(
            "memory_search",
            json!({"project_id": "/p", "query": "q", "group_id": "feature-x", "top_k": 3}),
        )
        .await
        .unwrap();

    let searches = fake.searches.lock().unwrap();
    assert_eq!(searches[0].top_k, 3);
    assert_eq!(searches[0].group_id.as_deref(), Some("feature-x"));
}

#[tokio::test]
async fn test_add_note_tool() {
    let (fake, toolkit) = toolkit();
    let output = toolkit
        .call(
            "memory_add_note",
            json!({
                "project_id": "/p",
                "group_id": "global",
                "text": "Always use pytest",
                "title": "Testing",
                "tags": ["testing"]
            }),
        )
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed, json!({"id": "note-1", "namespace": NAMESPACE}));

    let added = fake.added.lock().unwrap();
    assert_eq!(added[0].title.as_deref(), Some("Testing"));
    assert_eq!(added[0].tags, Some(vec!["testing".to_string()]));
}

#[tokio::test]
async fn test_get_note_tool_propagates_not_found() {
    let (_, toolkit) = toolkit();
    let output = toolkit
        .call("memory_get_note", json!({"note_id": "abc"}))
        .await
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["id"], "abc");

    let err = toolkit
        .call("memory_get_note", json!({"note_id": "missing"}))
        .await
        .unwrap_err();
    assert!(err.as_rpc().unwrap().is_not_found());
}

#[tokio::test]
async fn test_list_recent_tool_defaults_limit() {
    let (fake, toolkit) = toolkit();
    let output = toolkit
        .call("memory_list_recent", json!({"project_id": "/p"}))
        .await
        .unwrap();

    let items: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(items[0]["id"], "n2");
    assert_eq!(items[1]["id"], "n1");
    assert_eq!(fake.listed.lock().unwrap()[0].limit, Some(10));
}

#[tokio::test]
async fn test_upsert_global_tool_keeps_value() {
    let (fake, toolkit) = toolkit();
    let output = toolkit
        .call(
            "memory_upsert_global",
            json!({"project_id": "/p", "key": "global.style", "value": {"max_line_length": 100}}),
        )
        .await
        .unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["ok"], true);
    assert_eq!(parsed["id"], "global-1");
    assert_eq!(
        fake.upserts.lock().unwrap()[0].value,
        json!({"max_line_length": 100})
    );
}

#[tokio::test]
async fn test_get_global_tool_found_and_missing() {
    let (_, toolkit) = toolkit();

    let output = toolkit
        .call("memory_get_global", json!({"project_id": "/p", "key": "global.style"}))
        .await
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["found"], true);
    assert_eq!(parsed["value"], json!({"use_tabs": false}));

    let output = toolkit
        .call("memory_get_global", json!({"project_id": "/p", "key": "global.none"}))
        .await
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["found"], false);
}

#[tokio::test]
async fn test_unknown_tool_is_config_error() {
    let (_, toolkit) = toolkit();
    let err = toolkit.call("memory_drop_all", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_bad_arguments_are_decode_errors() {
    let (fake, toolkit) = toolkit();

    let err = toolkit
        .call("memory_search", json!({"project_id": "/p"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
    assert!(err.to_string().contains("memory_search"));

    let err = toolkit
        .call("memory_get_note", json!({"note_id": "n1", "extra": true}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Decode(_)));

    assert!(fake.searches.lock().unwrap().is_empty());
}
