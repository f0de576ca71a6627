//! # mnemo-core
//!
//! Core types for the mnemo memory-service client.
//!
//! This crate provides the vocabulary shared by the transport and the
//! domain façade in `mnemo-client`:
//! - the error taxonomy and JSON-RPC error-code table
//! - decoded result records (notes, search/list pages, config, global values)
//! - centralized default constants

pub mod defaults;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use error::{Error, Result, RpcError, RpcErrorCode};
pub use models::*;
