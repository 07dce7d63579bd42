//! # Codelink Compiler
//!
//! Static-analysis-to-template pipeline: finds `figma.connect` declarations
//! in TypeScript/JSX sources, parses their property mappings into a
//! serializable intrinsic model, compiles the example-rendering function
//! into a self-contained code-generation template, and emits one
//! `CodeConnectDocument` per declaration.
//!
//! ## Pipeline Invariants
//!
//! 1. **Immutable model**: intrinsics are created from a single property
//!    mapping object literal and never mutated; documents are regenerated
//!    in full on every parse.
//! 2. **Deterministic output**: the template prelude is byte-identical
//!    across runs and `const` declarations follow mapping order, so two
//!    parses of unchanged sources produce identical documents.
//! 3. **No hidden state**: synthetic binding names come from an explicit
//!    counter threaded through the renderer, and the shared project context
//!    is read-only during parsing, so files parse independently and in
//!    parallel.
//! 4. **Errors carry positions**: every parse error names the offending
//!    file plus a 1-based line/column; only unresolved imports degrade,
//!    as a warning with empty source metadata.

pub mod config;
pub mod declaration;
pub mod discovery;
pub mod document;
pub mod error;
pub mod intrinsic_parser;
pub mod intrinsics;
pub mod parse;
pub mod template;

#[cfg(test)]
mod pipeline_tests;

pub use config::ProjectConfig;
pub use discovery::discover_source_files;
pub use document::{CodeConnectDocument, Link, SourceLocation, TemplateData};
pub use error::{ParseWarning, ParserError, Severity};
pub use intrinsics::{Intrinsic, IntrinsicKind, Modifier, PropMapping, ValueMapping};
pub use parse::{parse_source, parse_source_files, FileResult, ParseOutcome, ProjectContext};
