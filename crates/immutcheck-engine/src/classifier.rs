//! Field type classification
//!
//! Decides which immutability category a field's declared type falls into.
//! Classification never emits diagnostics and never recurses into the
//! structural validator: a referenced type that carries the marker is
//! trusted as-is, which keeps cyclic type graphs finite.

use immutcheck_core::{ElementKind, FieldDeclaration, KnownImmutableRegistry, TypeGraphProvider, TypeRef};

/// Immutability category of a field's declared type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldClass {
    /// Primitive value type
    PrimitiveOk,

    /// Listed in the known-immutable registry
    RegistryOk,

    /// Referenced type itself carries the marker
    SelfAnnotatedOk,

    /// Referenced type is an enumeration
    EnumOk,

    /// Field declaration carries the marker as an override
    FieldOverrideOk,

    /// None of the above; carries the offending type name
    Invalid { type_name: String },
}

impl FieldClass {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Invalid { .. })
    }

    /// Short label for terminal output
    pub fn label(&self) -> &'static str {
        match self {
            Self::PrimitiveOk => "primitive",
            Self::RegistryOk => "known immutable",
            Self::SelfAnnotatedOk => "annotated type",
            Self::EnumOk => "enum",
            Self::FieldOverrideOk => "field override",
            Self::Invalid { .. } => "invalid",
        }
    }
}

impl std::fmt::Display for FieldClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { type_name } => write!(f, "invalid ({})", type_name),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Classifies fields against a provider and a registry snapshot
pub struct FieldTypeClassifier<'a, P: TypeGraphProvider + ?Sized> {
    provider: &'a P,
    registry: &'a KnownImmutableRegistry,
}

impl<'a, P: TypeGraphProvider + ?Sized> FieldTypeClassifier<'a, P> {
    pub fn new(provider: &'a P, registry: &'a KnownImmutableRegistry) -> Self {
        Self { provider, registry }
    }

    /// Classify a field; the first matching category wins
    pub fn classify(&self, field: &FieldDeclaration) -> FieldClass {
        let type_name = match &field.declared_type {
            TypeRef::Primitive(_) => return FieldClass::PrimitiveOk,
            TypeRef::Named(name) => name,
        };

        if self.registry.contains(type_name) {
            return FieldClass::RegistryOk;
        }

        match self.provider.resolve(&field.declared_type) {
            Some(decl) if decl.annotated_immutable => return FieldClass::SelfAnnotatedOk,
            Some(decl) if decl.kind == ElementKind::Enum => return FieldClass::EnumOk,
            Some(_) => {}
            None => {
                tracing::debug!(
                    field = %field.qualified_name(),
                    declared_type = %type_name,
                    "declared type not found in type graph"
                );
            }
        }

        if field.annotated_immutable {
            return FieldClass::FieldOverrideOk;
        }

        FieldClass::Invalid { type_name: type_name.clone() }
    }
}
