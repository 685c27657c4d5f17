//! Structural validation of annotated classes
//!
//! Every rule is checked for every field; validation never stops at the
//! first violation.

use crate::classifier::{FieldClass, FieldTypeClassifier};
use crate::emitter::DiagnosticEmitter;
use immutcheck_core::{Diagnostic, Modifier, TypeDeclaration, TypeGraphProvider};

/// Checks class shape and field rules
pub struct StructuralValidator<'a, P: TypeGraphProvider + ?Sized> {
    classifier: FieldTypeClassifier<'a, P>,
    emitter: DiagnosticEmitter<'a>,
}

impl<'a, P: TypeGraphProvider + ?Sized> StructuralValidator<'a, P> {
    pub fn new(classifier: FieldTypeClassifier<'a, P>, emitter: DiagnosticEmitter<'a>) -> Self {
        Self { classifier, emitter }
    }

    /// Validate a class carrying the marker
    ///
    /// Diagnostics come out in check order: extensibility first, then for
    /// each field in declared order finality, visibility and type.
    pub fn validate_class(&self, decl: &TypeDeclaration) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if !decl.has_modifier(Modifier::Final) {
            diagnostics.push(self.emitter.not_final(decl));
        }

        for field in &decl.fields {
            if !field.has_modifier(Modifier::Final) {
                diagnostics.push(self.emitter.field_not_final(decl, field));
            }

            if !field.has_modifier(Modifier::Private) {
                diagnostics.push(self.emitter.field_not_private(decl, field));
            }

            let class = self.classifier.classify(field);
            tracing::debug!(field = %field.qualified_name(), class = %class, "classified field");

            if let FieldClass::Invalid { type_name } = class {
                diagnostics.push(self.emitter.field_invalid_type(decl, field, &type_name));
            }
        }

        diagnostics
    }
}
