//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};
use crate::model::ElementKind;

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Declaration shape
    /// The immutability marker is applied to something other than a class or field
    ImmutableWrongKind,

    /// An annotated class can be extended (not final)
    ImmutableNotFinal,

    // Field checks
    /// A field of an annotated class is not final
    ImmutableFieldNotFinal,

    /// A field of an annotated class is not private
    ImmutableFieldNotPrivate,

    /// A field's declared type is not known to be immutable
    ImmutableFieldInvalidType,
}

impl DiagnosticCode {
    /// All codes, in check order
    pub const ALL: [DiagnosticCode; 5] = [
        Self::ImmutableWrongKind,
        Self::ImmutableNotFinal,
        Self::ImmutableFieldNotFinal,
        Self::ImmutableFieldNotPrivate,
        Self::ImmutableFieldInvalidType,
    ];

    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImmutableWrongKind => "IMMUTABLE_WRONG_KIND",
            Self::ImmutableNotFinal => "IMMUTABLE_NOT_FINAL",
            Self::ImmutableFieldNotFinal => "IMMUTABLE_FIELD_NOT_FINAL",
            Self::ImmutableFieldNotPrivate => "IMMUTABLE_FIELD_NOT_PRIVATE",
            Self::ImmutableFieldInvalidType => "IMMUTABLE_FIELD_INVALID_TYPE",
        }
    }

    /// Severity used when no override is configured
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational note
    Note,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail the build
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note => write!(f, "note"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The element a diagnostic is attributed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Qualified element path (`com.example.Person` or `com.example.Person.name`)
    pub element: String,

    /// Kind of the implicated element
    pub kind: ElementKind,

    /// Source file reported by the front end, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Optional line number (1-indexed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl Location {
    /// Create a location pointing at an element with no source position
    pub fn new(element: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            element: element.into(),
            kind,
            file: None,
            line: None,
        }
    }

    /// Attach a source file
    pub fn with_file(mut self, file: Option<String>) -> Self {
        self.file = file;
        self
    }

    /// Attach a line number
    pub fn with_line(mut self, line: Option<usize>) -> Self {
        self.line = line;
        self
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{}:{} ({})", file, line, self.element),
            (Some(file), None) => write!(f, "{} ({})", file, self.element),
            _ => write!(f, "{}", self.element),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Implicated element
    pub location: Option<Location>,

    /// Expected value (e.g. the missing modifier)
    pub expected: Option<String>,

    /// Actual value (e.g. the offending kind or type)
    pub actual: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            expected: None,
            actual: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set expected/actual values
    pub fn with_comparison(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}
