#![deny(missing_docs)]

//! # CDD Compiler Core
//!
//! Generates the source of a document compiler from a schema domain model.
//! For every type of the domain the generated unit holds a validating
//! constructor, a `$ref` resolver and a serializer back to generic nodes; the
//! unit runs against the `cdd-compiler-runtime` crate.

/// Shared error types.
pub mod error;

/// The schema domain model.
pub mod domain;

/// Rust identifiers for schema names.
pub mod naming;

/// Key pattern deduplication.
pub mod patterns;

/// Constructor generation.
pub mod constructor;

/// Reference resolver generation.
pub mod resolver;

/// Serializer generation.
pub mod serializer;

/// Type declaration generation.
pub mod declarations;

/// Unit assembly.
pub mod compiler;

#[cfg(test)]
mod testing;

pub use compiler::{
    generate_compiler, generate_compiler_with_options, GeneratorOptions, DEFAULT_IMPORTS,
    GENERATED_MARKER,
};
pub use constructor::generate_constructor;
pub use declarations::generate_declaration;
pub use domain::{
    Domain, FormatVersion, PropertyKind, PropertyModel, ScalarKind, TypeModel, TypeShape,
};
pub use error::{AppError, AppResult};
pub use patterns::PatternAllocator;
pub use resolver::generate_resolver;
pub use serializer::generate_serializer;
