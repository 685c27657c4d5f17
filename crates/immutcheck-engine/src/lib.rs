//! immutcheck engine - Core verification logic
//!
//! This crate implements the immutability verifier:
//! - Field type classification
//! - Structural validation of annotated classes
//! - Diagnostic construction
//! - The verification driver

pub mod classifier;
pub mod emitter;
pub mod validator;
pub mod verifier;

pub use classifier::{FieldClass, FieldTypeClassifier};
pub use emitter::DiagnosticEmitter;
pub use validator::StructuralValidator;
pub use verifier::{Verification, Verifier};
