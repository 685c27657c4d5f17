//! Verification driver
//!
//! Runs over every element carrying the immutability marker, in the order
//! the provider reports them, and collects all diagnostics.

use crate::classifier::FieldTypeClassifier;
use crate::emitter::DiagnosticEmitter;
use crate::validator::StructuralValidator;
use immutcheck_core::{
    AllowlistRules, AnnotatedElement, Config, Diagnostic, ElementKind, KnownImmutableRegistry,
    Report, Severity, SeverityThreshold, TypeGraphProvider,
};

/// Outcome of one verification run
#[derive(Debug, Clone, Default)]
pub struct Verification {
    /// Diagnostics in emission order
    pub diagnostics: Vec<Diagnostic>,

    /// Annotated elements processed (including skipped ones)
    pub elements_checked: usize,

    /// Classes that went through structural validation
    pub classes_verified: usize,

    /// Fields classified during validation
    pub fields_classified: usize,

    /// Elements skipped by allowlist rules
    pub skipped: Vec<String>,
}

impl Verification {
    /// Check if the run produced any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Check if the run produced any warnings
    pub fn has_warnings(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Warn)
    }

    /// Get count of errors
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Get count of warnings
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Warn).count()
    }

    /// Diagnostics attributed to `element` (a type or `Type.field` path)
    pub fn diagnostics_for<'v>(&'v self, element: &'v str) -> impl Iterator<Item = &'v Diagnostic> + 'v {
        self.diagnostics.iter().filter(move |d| {
            d.location.as_ref().is_some_and(|loc| {
                loc.element == element
                    || loc.element.strip_prefix(element).is_some_and(|rest| rest.starts_with('.'))
            })
        })
    }

    /// Build a versioned report from this run
    pub fn to_report(&self) -> Report {
        Report::from_diagnostics(self.diagnostics.clone())
            .with_counts(self.elements_checked, self.classes_verified)
    }
}

/// Immutability verifier
///
/// Holds a shared borrow of the registry for its whole lifetime, so the
/// registry cannot change in the middle of a run.
pub struct Verifier<'a> {
    registry: &'a KnownImmutableRegistry,
    severity: SeverityThreshold,
    allowlist: AllowlistRules,
}

impl<'a> Verifier<'a> {
    /// Create a verifier with default severities and no allowlist
    pub fn new(registry: &'a KnownImmutableRegistry) -> Self {
        Self {
            registry,
            severity: SeverityThreshold::default(),
            allowlist: AllowlistRules::default(),
        }
    }

    /// Create a verifier using the severity and allowlist sections of `config`
    pub fn from_config(config: &Config, registry: &'a KnownImmutableRegistry) -> Self {
        Self {
            registry,
            severity: config.severity.clone(),
            allowlist: config.allowlist.clone(),
        }
    }

    /// Set severity overrides
    pub fn with_severity(mut self, severity: SeverityThreshold) -> Self {
        self.severity = severity;
        self
    }

    /// Set allowlist rules
    pub fn with_allowlist(mut self, allowlist: AllowlistRules) -> Self {
        self.allowlist = allowlist;
        self
    }

    pub fn registry(&self) -> &KnownImmutableRegistry {
        self.registry
    }

    /// Field classifier bound to `provider`
    pub fn classifier<'p, P>(&'p self, provider: &'p P) -> FieldTypeClassifier<'p, P>
    where
        P: TypeGraphProvider + ?Sized,
    {
        FieldTypeClassifier::new(provider, self.registry)
    }

    /// Verify every annotated element the provider reports
    pub fn verify<P>(&self, provider: &P) -> Verification
    where
        P: TypeGraphProvider + ?Sized,
    {
        let mut outcome = Verification::default();

        for element in provider.annotated_elements() {
            outcome.elements_checked += 1;

            let owner = match element {
                AnnotatedElement::Type(decl) => &decl.name,
                AnnotatedElement::Field { owner, .. } => &owner.name,
            };
            if self.allowlist.is_type_skipped(owner) {
                tracing::debug!(element = %element.name(), "skipped by allowlist");
                outcome.skipped.push(element.name());
                continue;
            }

            if let AnnotatedElement::Type(decl) = element {
                if decl.kind == ElementKind::Class {
                    outcome.classes_verified += 1;
                    outcome.fields_classified += decl.fields.len();
                }
            }

            let diagnostics = self.verify_element(provider, element);
            tracing::debug!(
                element = %element.name(),
                kind = %element.kind(),
                diagnostics = diagnostics.len(),
                "verified element"
            );
            outcome.diagnostics.extend(diagnostics);
        }

        tracing::info!(
            elements = outcome.elements_checked,
            classes = outcome.classes_verified,
            errors = outcome.error_count(),
            warnings = outcome.warning_count(),
            "verification finished"
        );

        outcome
    }

    /// Verify a single annotated element
    pub fn verify_element<P>(&self, provider: &P, element: AnnotatedElement<'_>) -> Vec<Diagnostic>
    where
        P: TypeGraphProvider + ?Sized,
    {
        let emitter = DiagnosticEmitter::new(&self.severity);

        match element {
            // A marked field is an override consumed by classification
            AnnotatedElement::Field { .. } => Vec::new(),
            AnnotatedElement::Type(decl) => match decl.kind {
                ElementKind::Class => {
                    let validator = StructuralValidator::new(self.classifier(provider), emitter);
                    validator.validate_class(decl)
                }
                ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation => {
                    vec![emitter.wrong_kind(decl)]
                }
                // Only reachable if a provider reports a field as a type
                ElementKind::Field => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use immutcheck_core::{DiagnosticCode, FieldDeclaration, Modifier, TypeDeclaration, TypeRef};

    /// Provider over a list of declarations, insertion ordered
    struct Declarations(Vec<TypeDeclaration>);

    impl TypeGraphProvider for Declarations {
        fn annotated_elements(&self) -> Vec<AnnotatedElement<'_>> {
            let mut elements = Vec::new();
            for decl in &self.0 {
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
            self.0.iter().find(|d| d.name == name)
        }
    }

    fn private_final(name: &str, type_ref: TypeRef) -> FieldDeclaration {
        FieldDeclaration::new(name, type_ref).with_modifiers([Modifier::Private, Modifier::Final])
    }

    #[test]
    fn wrong_kind_stops_further_checks() {
        let provider = Declarations(vec![
            TypeDeclaration::new("com.example.Shape", ElementKind::Interface)
                .annotated()
                .with_field(FieldDeclaration::new("SIDES", TypeRef::named("java.util.List"))),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();

        let outcome = Verifier::new(&registry).verify(&provider);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::ImmutableWrongKind);
        assert!(outcome.diagnostics[0].message.ends_with("(type is: interface)"));
        assert_eq!(outcome.classes_verified, 0);
    }

    #[test]
    fn annotated_field_alone_is_silent() {
        let provider = Declarations(vec![
            TypeDeclaration::class("com.example.Holder")
                .with_field(FieldDeclaration::new("items", TypeRef::named("java.util.List")).annotated()),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();

        let outcome = Verifier::new(&registry).verify(&provider);
        assert_eq!(outcome.elements_checked, 1);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn elements_processed_in_insertion_order() {
        let provider = Declarations(vec![
            TypeDeclaration::class("com.example.B").annotated(),
            TypeDeclaration::enumeration("com.example.A").annotated(),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();

        let outcome = Verifier::new(&registry).verify(&provider);
        let codes: Vec<DiagnosticCode> = outcome.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::ImmutableNotFinal, DiagnosticCode::ImmutableWrongKind]);
    }

    #[test]
    fn allowlist_skips_types_and_their_fields() {
        let provider = Declarations(vec![
            TypeDeclaration::class("com.example.generated.Dto")
                .annotated()
                .with_field(FieldDeclaration::new("raw", TypeRef::named("java.util.Map")).annotated()),
            TypeDeclaration::class("com.example.Kept").annotated(),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();
        let allowlist = AllowlistRules { skip_types: vec!["com.example.generated.*".to_string()] };

        let outcome = Verifier::new(&registry).with_allowlist(allowlist).verify(&provider);
        assert_eq!(outcome.elements_checked, 3);
        assert_eq!(outcome.skipped, vec!["com.example.generated.Dto", "com.example.generated.Dto.raw"]);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].location.as_ref().unwrap().element, "com.example.Kept");
    }

    #[test]
    fn severity_overrides_flow_through() {
        let provider = Declarations(vec![
            TypeDeclaration::class("com.example.Loose")
                .annotated()
                .with_modifiers([Modifier::Final])
                .with_field(FieldDeclaration::new("id", TypeRef::primitive("long"))
                    .with_modifiers([Modifier::Final])),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();
        let config = Config::from_toml(r#"
            [severity.overrides]
            IMMUTABLE_FIELD_NOT_PRIVATE = "warn"
        "#).unwrap();

        let outcome = Verifier::from_config(&config, &registry).verify(&provider);
        assert!(!outcome.has_errors());
        assert!(outcome.has_warnings());
        assert_eq!(outcome.warning_count(), 1);
        assert_eq!(outcome.to_report().summary.warnings, 1);
    }

    #[test]
    fn diagnostics_for_filters_by_element() {
        let provider = Declarations(vec![
            TypeDeclaration::class("com.example.Pair")
                .annotated()
                .with_field(private_final("left", TypeRef::named("java.util.Date")))
                .with_field(private_final("right", TypeRef::primitive("int"))),
            TypeDeclaration::class("com.example.PairBuilder").annotated(),
        ]);
        let registry = KnownImmutableRegistry::with_defaults();

        let outcome = Verifier::new(&registry).verify(&provider);
        assert_eq!(outcome.diagnostics_for("com.example.Pair").count(), 2);
        assert_eq!(outcome.diagnostics_for("com.example.Pair.left").count(), 1);
        assert_eq!(outcome.diagnostics_for("com.example.PairBuilder").count(), 1);
        assert_eq!(outcome.fields_classified, 2);
    }
}
