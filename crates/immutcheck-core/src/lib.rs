//! immutcheck Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod model;
pub mod registry;
pub mod provider;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use model::{ElementKind, Modifier, TypeDeclaration, FieldDeclaration, TypeRef};
pub use registry::KnownImmutableRegistry;
pub use provider::{TypeGraphProvider, AnnotatedElement};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, SeverityThreshold, AllowlistRules};
