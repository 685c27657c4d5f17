//! Type graph document loading
//!
//! This crate handles:
//! - Parsing the JSON type graph emitted by the host front end
//! - Stamping and checking field ownership
//! - Merging documents discovered on disk
//! - Serving the loaded graph through `TypeGraphProvider`

pub mod document;
pub mod discover;

pub use document::{TypeGraph, TypeGraphDocument, GraphMetadata, GraphError};
pub use discover::{discover_documents, load_paths};
