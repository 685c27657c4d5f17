//! Discover and load type graph documents from disk

use crate::document::{GraphError, TypeGraph};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find every `*.json` document below `root`, sorted by path
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    let mut documents: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    documents.sort();
    documents
}

/// Load and merge the documents at `paths`
///
/// Each path may be a single document or a directory to search. Documents
/// are merged in the order given (directory contents sorted by path).
pub fn load_paths(paths: &[PathBuf]) -> Result<TypeGraph, GraphError> {
    let mut graph = TypeGraph::new();

    for path in paths {
        let documents = if path.is_dir() {
            discover_documents(path)
        } else {
            vec![path.clone()]
        };

        if documents.is_empty() {
            tracing::warn!(path = %path.display(), "no type graph documents found");
        }

        for document in documents {
            tracing::debug!(path = %document.display(), "loading type graph document");
            let loaded = TypeGraph::from_file(&document)?;
            graph.merge(loaded)?;
        }
    }

    tracing::debug!(types = graph.len(), "type graph loaded");
    Ok(graph)
}
