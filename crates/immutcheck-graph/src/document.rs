//! Type graph document parsing
//!
//! The host front end serializes every declaration it saw in a compilation
//! round into one JSON document. `TypeGraph` indexes that document and
//! answers provider queries against it.

use immutcheck_core::{AnnotatedElement, TypeDeclaration, TypeGraphProvider};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Document metadata (all optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// Tool that produced the document
    #[serde(default)]
    pub producer: Option<String>,

    /// Generation timestamp as reported by the producer
    #[serde(default)]
    pub generated_at: Option<String>,
}

/// On-disk JSON shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraphDocument {
    #[serde(default)]
    pub metadata: GraphMetadata,

    /// Type declarations in the order the front end reported them
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
}

/// Indexed, validated type graph
#[derive(Debug, Clone, Default)]
pub struct TypeGraph {
    metadata: GraphMetadata,
    types: Vec<TypeDeclaration>,
    index: HashMap<String, usize>,
}

impl TypeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from file
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GraphError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse a graph from a JSON string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> Result<Self, GraphError> {
        let document: TypeGraphDocument = serde_json::from_str(json)
            .map_err(|e| GraphError::ParseError(e.to_string()))?;

        Self::from_document(document)
    }

    /// Validate and index a parsed document
    pub fn from_document(document: TypeGraphDocument) -> Result<Self, GraphError> {
        let mut graph = Self {
            metadata: document.metadata,
            types: Vec::with_capacity(document.types.len()),
            index: HashMap::new(),
        };

        for decl in document.types {
            graph.insert(decl)?;
        }

        Ok(graph)
    }

    /// Build a graph directly from declarations
    pub fn from_declarations(
        declarations: impl IntoIterator<Item = TypeDeclaration>,
    ) -> Result<Self, GraphError> {
        Self::from_document(TypeGraphDocument {
            metadata: GraphMetadata::default(),
            types: declarations.into_iter().collect(),
        })
    }

    /// Add one declaration, stamping field owners
    pub fn insert(&mut self, mut decl: TypeDeclaration) -> Result<(), GraphError> {
        if self.index.contains_key(&decl.name) {
            return Err(GraphError::DuplicateType(decl.name));
        }

        let mut seen_fields = HashSet::new();
        for field in &mut decl.fields {
            if !seen_fields.insert(field.name.clone()) {
                return Err(GraphError::DuplicateField {
                    owner: decl.name.clone(),
                    field: field.name.clone(),
                });
            }

            if field.owner.is_empty() {
                field.owner = decl.name.clone();
            } else if field.owner != decl.name {
                return Err(GraphError::OwnerMismatch {
                    field: field.name.clone(),
                    declared: field.owner.clone(),
                    enclosing: decl.name.clone(),
                });
            }
        }

        self.index.insert(decl.name.clone(), self.types.len());
        self.types.push(decl);
        Ok(())
    }

    /// Append every declaration of `other`
    ///
    /// Metadata already set on `self` wins; missing fields are taken from
    /// `other`. Fails on the first duplicate type.
    pub fn merge(&mut self, other: TypeGraph) -> Result<(), GraphError> {
        if self.metadata.producer.is_none() {
            self.metadata.producer = other.metadata.producer;
        }
        if self.metadata.generated_at.is_none() {
            self.metadata.generated_at = other.metadata.generated_at;
        }

        for decl in other.types {
            self.insert(decl)?;
        }
        Ok(())
    }

    /// Get a declaration by fully qualified name
    pub fn get(&self, name: &str) -> Option<&TypeDeclaration> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// All declarations in insertion order
    pub fn types(&self) -> &[TypeDeclaration] {
        &self.types
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// SHA-256 over the canonical JSON of all declarations
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for decl in &self.types {
            // Serializing plain data structs cannot fail
            let bytes = serde_json::to_vec(decl).unwrap_or_default();
            hasher.update(&bytes);
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl TypeGraphProvider for TypeGraph {
    fn annotated_elements(&self) -> Vec<AnnotatedElement<'_>> {
        let mut elements = Vec::new();
        for decl in &self.types {
            if decl.annotated_immutable {
                elements.push(AnnotatedElement::Type(decl));
            }
            for field in decl.annotated_fields() {
                elements.push(AnnotatedElement::Field { owner: decl, field });
            }
        }
        elements
    }

    fn type_declaration(&self, name: &str) -> Option<&TypeDeclaration> {
        self.get(name)
    }
}

/// Type graph loading errors
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Failed to read type graph file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse type graph JSON: {0}")]
    ParseError(String),

    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Field '{field}' is declared more than once in '{owner}'")]
    DuplicateField { owner: String, field: String },

    #[error("Field '{field}' claims owner '{declared}' but is enclosed by '{enclosing}'")]
    OwnerMismatch {
        field: String,
        declared: String,
        enclosing: String,
    },
}
