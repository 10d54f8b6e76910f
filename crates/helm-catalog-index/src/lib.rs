//! Parser for the `index.yaml` file served by a Helm chart repository.
//!
//! The index is read with a small, indentation driven state machine instead of
//! a general purpose YAML library. Only the subset Helm actually emits is
//! understood: chart headers, version blocks, scalar fields, block and inline
//! sequences, and block scalars. Lines that match no rule are skipped.

mod document;
mod parser;
mod scalar;

pub use document::{Document, Value, VersionRecord};
pub use parser::{Diagnostic, DiagnosticKind, IndexParser, ParseOutput, parse};
