//! Known-immutable type registry
//!
//! Type identifiers listed here are trusted as immutable without looking at
//! their declarations. The registry only grows; a verification run borrows
//! it immutably for its whole duration.

use std::collections::BTreeSet;

/// Library types trusted out of the box
pub const DEFAULT_KNOWN_IMMUTABLE: &[&str] = &[
    "java.lang.String",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
];

/// Set of fully qualified type identifiers treated as immutable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownImmutableRegistry {
    types: BTreeSet<String>,
}

impl KnownImmutableRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with [`DEFAULT_KNOWN_IMMUTABLE`]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for type_id in DEFAULT_KNOWN_IMMUTABLE {
            registry.register_known_immutable(*type_id);
        }
        registry
    }

    /// Trust `type_id` as immutable for all subsequent classifications
    ///
    /// Returns `false` if the identifier was already registered.
    pub fn register_known_immutable(&mut self, type_id: impl Into<String>) -> bool {
        self.types.insert(type_id.into())
    }

    /// Builder-style registration
    pub fn with_known_immutable(mut self, type_id: impl Into<String>) -> Self {
        self.register_known_immutable(type_id);
        self
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains(type_id)
    }

    /// Registered identifiers in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl<S: Into<String>> Extend<S> for KnownImmutableRegistry {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for type_id in iter {
            self.register_known_immutable(type_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_string() {
        let registry = KnownImmutableRegistry::with_defaults();
        assert!(registry.contains("java.lang.String"));
        assert!(registry.contains("java.lang.Integer"));
        assert!(!registry.contains("java.util.Date"));
        assert_eq!(registry.len(), DEFAULT_KNOWN_IMMUTABLE.len());
    }

    #[test]
    fn registration_is_append_only() {
        let mut registry = KnownImmutableRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register_known_immutable("java.time.LocalDate"));
        assert!(!registry.register_known_immutable("java.time.LocalDate"));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("java.time.LocalDate"));
    }

    #[test]
    fn iteration_is_sorted() {
        let mut registry = KnownImmutableRegistry::new()
            .with_known_immutable("java.util.UUID");
        registry.extend(["java.math.BigDecimal", "java.time.Instant"]);

        let ids: Vec<&str> = registry.iter().collect();
        assert_eq!(ids, vec!["java.math.BigDecimal", "java.time.Instant", "java.util.UUID"]);
    }
}
