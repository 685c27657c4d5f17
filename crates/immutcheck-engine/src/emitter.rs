//! Diagnostic construction
//!
//! Message templates are consumed by downstream tooling and must not change.

use immutcheck_core::{
    Diagnostic, DiagnosticCode, ElementKind, FieldDeclaration, Location, Modifier,
    SeverityThreshold, TypeDeclaration,
};

/// Builds diagnostics with configured severities
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticEmitter<'a> {
    severity: &'a SeverityThreshold,
}

impl<'a> DiagnosticEmitter<'a> {
    pub fn new(severity: &'a SeverityThreshold) -> Self {
        Self { severity }
    }

    fn diagnostic(&self, code: DiagnosticCode, message: String, location: Location) -> Diagnostic {
        let severity = self.severity.get_severity(code, code.default_severity());
        Diagnostic::new(code, severity, message).with_location(location)
    }

    /// Marker applied to an interface, enum or annotation
    pub fn wrong_kind(&self, decl: &TypeDeclaration) -> Diagnostic {
        let message = format!(
            "{} is annotated as @Immutable but is not a class (type is: {})",
            decl.name, decl.kind
        );
        self.diagnostic(DiagnosticCode::ImmutableWrongKind, message, type_location(decl))
            .with_comparison(ElementKind::Class.as_str(), decl.kind.as_str())
    }

    /// Annotated class without `final`
    pub fn not_final(&self, decl: &TypeDeclaration) -> Diagnostic {
        let message = format!(
            "{} is annotated as @Immutable but is not marked as final",
            decl.name
        );
        self.diagnostic(DiagnosticCode::ImmutableNotFinal, message, type_location(decl))
            .with_comparison(Modifier::Final.as_str(), modifiers_text(decl.modifiers.iter()))
    }

    pub fn field_not_final(&self, decl: &TypeDeclaration, field: &FieldDeclaration) -> Diagnostic {
        let message = format!(
            "{} declared @Immutable contains non-final field '{}'",
            decl.name, field.name
        );
        self.diagnostic(DiagnosticCode::ImmutableFieldNotFinal, message, field_location(decl, field))
            .with_comparison(Modifier::Final.as_str(), modifiers_text(field.modifiers.iter()))
    }

    pub fn field_not_private(&self, decl: &TypeDeclaration, field: &FieldDeclaration) -> Diagnostic {
        let message = format!(
            "{} declared @Immutable contains non-private field '{}'",
            decl.name, field.name
        );
        self.diagnostic(DiagnosticCode::ImmutableFieldNotPrivate, message, field_location(decl, field))
            .with_comparison(Modifier::Private.as_str(), modifiers_text(field.modifiers.iter()))
    }

    pub fn field_invalid_type(
        &self,
        decl: &TypeDeclaration,
        field: &FieldDeclaration,
        type_name: &str,
    ) -> Diagnostic {
        let message = format!(
            "{} declared @Immutable contains field '{}' with invalid type '{}'. Fields should \
             be either of primitive or an immutable type. Valid immutable types are known \
             immutable library types (e.g., a string type) or types directly annotated with the \
             immutability marker. Finally, it's possible to annotate the field declaration with \
             the immutability marker as a workaround.",
            decl.name, field.name, type_name
        );
        self.diagnostic(DiagnosticCode::ImmutableFieldInvalidType, message, field_location(decl, field))
            .with_comparison("immutable type", type_name)
    }
}

fn type_location(decl: &TypeDeclaration) -> Location {
    Location::new(&decl.name, decl.kind)
        .with_file(decl.file.clone())
        .with_line(decl.line)
}

fn field_location(decl: &TypeDeclaration, field: &FieldDeclaration) -> Location {
    Location::new(format!("{}.{}", decl.name, field.name), ElementKind::Field)
        .with_file(decl.file.clone())
        .with_line(field.line)
}

fn modifiers_text<'m>(modifiers: impl Iterator<Item = &'m Modifier>) -> String {
    let text: Vec<&str> = modifiers.map(Modifier::as_str).collect();
    if text.is_empty() {
        "(none)".to_string()
    } else {
        text.join(" ")
    }
}
