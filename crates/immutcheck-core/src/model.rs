//! Type graph model
//!
//! Passive declarations handed over by the host front end. The verifier
//! only ever reads these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of a declared element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Field,
}

impl ElementKind {
    /// Lowercase name used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Annotation => "annotation",
            Self::Field => "field",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declaration modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Transient,
    Volatile,
}

impl Modifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Static => "static",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reference to a declared type
///
/// Resolution of `Named` references is up to the type graph provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRef {
    /// Primitive value type (`int`, `boolean`, ...)
    Primitive(String),

    /// Fully qualified reference type
    Named(String),
}

impl TypeRef {
    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The type identifier as written by the front end
    pub fn identifier(&self) -> &str {
        match self {
            Self::Primitive(name) | Self::Named(name) => name,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// A field declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    /// Simple field name
    pub name: String,

    /// Declared type
    #[serde(rename = "type")]
    pub declared_type: TypeRef,

    /// Field modifiers
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,

    /// Field-level immutability override marker
    #[serde(default)]
    pub annotated_immutable: bool,

    /// Qualified name of the owning type (stamped by the loader)
    #[serde(default)]
    pub owner: String,

    /// Optional line number (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl FieldDeclaration {
    /// Create a field with no modifiers and no owner yet
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            declared_type,
            modifiers: BTreeSet::new(),
            annotated_immutable: false,
            owner: String::new(),
            line: None,
        }
    }

    /// Set modifiers
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    /// Mark the field declaration itself as immutable
    pub fn annotated(mut self) -> Self {
        self.annotated_immutable = true;
        self
    }

    /// Set the line number
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// `owner.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.owner, self.name)
    }
}

/// A declared type (class, interface, enum or annotation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    /// Fully qualified name
    pub name: String,

    /// Declaration kind
    pub kind: ElementKind,

    /// Type modifiers
    #[serde(default)]
    pub modifiers: BTreeSet<Modifier>,

    /// Declared fields, in source order
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,

    /// Whether the type carries the immutability marker
    #[serde(default)]
    pub annotated_immutable: bool,

    /// Source file reported by the front end
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Optional line number (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl TypeDeclaration {
    /// Create a new declaration of the given kind
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: BTreeSet::new(),
            fields: Vec::new(),
            annotated_immutable: false,
            file: None,
            line: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Class)
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Enum)
    }

    /// Set modifiers
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers = modifiers.into_iter().collect();
        self
    }

    /// Mark the type as immutable
    pub fn annotated(mut self) -> Self {
        self.annotated_immutable = true;
        self
    }

    /// Append a field, taking ownership of it
    pub fn with_field(mut self, mut field: FieldDeclaration) -> Self {
        field.owner = self.name.clone();
        self.fields.push(field);
        self
    }

    /// Set the source position
    pub fn with_source(mut self, file: impl Into<String>, line: usize) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    /// Find a field by name
    pub fn find_field(&self, name: &str) -> Option<&FieldDeclaration> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields carrying the override marker, in declared order
    pub fn annotated_fields(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.fields.iter().filter(|f| f.annotated_immutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_kind_display() {
        assert_eq!(ElementKind::Enum.to_string(), "enum");
        assert_eq!(ElementKind::Annotation.to_string(), "annotation");
    }

    #[test]
    fn with_field_stamps_owner() {
        let address = TypeDeclaration::class("com.example.Address")
            .with_modifiers([Modifier::Public, Modifier::Final])
            .with_field(
                FieldDeclaration::new("city", TypeRef::named("java.lang.String"))
                    .with_modifiers([Modifier::Private, Modifier::Final]),
            );

        let city = address.find_field("city").unwrap();
        assert_eq!(city.owner, "com.example.Address");
        assert_eq!(city.qualified_name(), "com.example.Address.city");
        assert!(city.has_modifier(Modifier::Final));
        assert!(address.has_modifier(Modifier::Final));
        assert!(address.find_field("zip").is_none());
    }

    #[test]
    fn type_ref_json_shape() {
        let json = serde_json::to_string(&TypeRef::primitive("int")).unwrap();
        assert_eq!(json, r#"{"primitive":"int"}"#);

        let parsed: TypeRef = serde_json::from_str(r#"{"named":"java.lang.String"}"#).unwrap();
        assert_eq!(parsed, TypeRef::named("java.lang.String"));
        assert_eq!(parsed.identifier(), "java.lang.String");
        assert!(!parsed.is_primitive());
    }

    #[test]
    fn declaration_defaults_from_json() {
        let decl: TypeDeclaration = serde_json::from_str(
            r#"{ "name": "com.example.Marker", "kind": "interface" }"#,
        ).unwrap();

        assert_eq!(decl.kind, ElementKind::Interface);
        assert!(decl.modifiers.is_empty());
        assert!(decl.fields.is_empty());
        assert!(!decl.annotated_immutable);
    }
}
