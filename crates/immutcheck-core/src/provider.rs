//! Type graph provider trait
//!
//! The verifier depends only on this capability set, never on a concrete
//! compiler front end.

use crate::diagnostic::Location;
use crate::model::{ElementKind, FieldDeclaration, TypeDeclaration, TypeRef};

/// An element carrying the immutability marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotatedElement<'a> {
    /// A marked type declaration (of any kind)
    Type(&'a TypeDeclaration),

    /// A marked field, together with its owning type
    Field {
        owner: &'a TypeDeclaration,
        field: &'a FieldDeclaration,
    },
}

impl<'a> AnnotatedElement<'a> {
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Type(decl) => decl.kind,
            Self::Field { .. } => ElementKind::Field,
        }
    }

    /// Qualified element path
    pub fn name(&self) -> String {
        match self {
            Self::Type(decl) => decl.name.clone(),
            Self::Field { field, .. } => field.qualified_name(),
        }
    }

    /// Location of this element for diagnostics
    pub fn location(&self) -> Location {
        match self {
            Self::Type(decl) => Location::new(&decl.name, decl.kind)
                .with_file(decl.file.clone())
                .with_line(decl.line),
            Self::Field { owner, field } => Location::new(field.qualified_name(), ElementKind::Field)
                .with_file(owner.file.clone())
                .with_line(field.line),
        }
    }
}

/// Access to the type graph of one verification run
pub trait TypeGraphProvider {
    /// Elements carrying the immutability marker, in insertion order
    fn annotated_elements(&self) -> Vec<AnnotatedElement<'_>>;

    /// Look up a type declaration by fully qualified name
    fn type_declaration(&self, name: &str) -> Option<&TypeDeclaration>;

    /// Resolve a declared field type to its declaration
    ///
    /// Primitives never resolve. A `Named` reference the provider knows
    /// nothing about resolves to `None`.
    fn resolve(&self, type_ref: &TypeRef) -> Option<&TypeDeclaration> {
        match type_ref {
            TypeRef::Primitive(_) => None,
            TypeRef::Named(name) => self.type_declaration(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Modifier;

    #[test]
    fn field_element_location() {
        let owner = TypeDeclaration::class("com.example.Person")
            .with_source("src/Person.java", 10)
            .with_field(
                FieldDeclaration::new("birthDate", TypeRef::named("java.util.Date"))
                    .with_modifiers([Modifier::Private, Modifier::Final])
                    .with_line(14)
                    .annotated(),
            );
        let field = &owner.fields[0];

        let element = AnnotatedElement::Field { owner: &owner, field };
        assert_eq!(element.kind(), ElementKind::Field);
        assert_eq!(element.name(), "com.example.Person.birthDate");

        let location = element.location();
        assert_eq!(location.file.as_deref(), Some("src/Person.java"));
        assert_eq!(location.line, Some(14));
        assert_eq!(location.kind, ElementKind::Field);
    }

    #[test]
    fn type_element_location() {
        let decl = TypeDeclaration::enumeration("com.example.Color").annotated();
        let element = AnnotatedElement::Type(&decl);

        assert_eq!(element.kind(), ElementKind::Enum);
        assert_eq!(element.location().element, "com.example.Color");
        assert_eq!(element.location().line, None);
    }
}
